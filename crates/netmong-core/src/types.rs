//! Core type definitions for netmong

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw value
            pub fn get(self) -> u64 {
                self.0
            }

            /// The identifier following this one
            pub fn next(self) -> crate::error::Result<Self> {
                self.0.checked_add(1).map($name).ok_or_else(|| {
                    crate::error::NetmongError::Storage(format!(
                        "No {} left after {}",
                        stringify!($name),
                        self.0
                    ))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                $name(value)
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for a comment, assigned by the store in creation order
    CommentId
);

numeric_id!(
    /// Unique identifier for a post
    PostId
);

numeric_id!(
    /// Unique identifier for a member
    MemberId
);

/// Requested slice of a listing (0-based page index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    /// Create a page request; a zero size is bumped to one
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    /// Create a page request from a 1-based page number as shown to users
    pub fn from_one_based(page: usize, size: usize) -> Self {
        Self::new(page.saturating_sub(1), size)
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Cut this page out of an already ordered list
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let items = items
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect();
        Page {
            items,
            page: self.page,
            size: self.size,
            total,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    /// Total number of items across all pages
    pub total: usize,
}

impl<T> Page<T> {
    /// An empty page for the given request
    pub fn empty(request: PageRequest) -> Self {
        Page {
            items: Vec::new(),
            page: request.page,
            size: request.size,
            total: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
