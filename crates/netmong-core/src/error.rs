//! Error types for netmong

use std::fmt;
use thiserror::Error;

/// Kind of record a lookup failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Post,
    Member,
    Comment,
    ParentComment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Post => write!(f, "Post"),
            Entity::Member => write!(f, "Member"),
            Entity::Comment => write!(f, "Comment"),
            Entity::ParentComment => write!(f, "Parent comment"),
        }
    }
}

/// Main error type for netmong
#[derive(Debug, Error)]
pub enum NetmongError {
    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    /// Input rejected before touching storage
    #[error("Validation error: {0}")]
    Validation(String),

    /// Actor is not allowed to perform the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NetmongError>,
    },
}

impl NetmongError {
    /// Shorthand for a `NotFound` error
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        NetmongError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        NetmongError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip context wrappers down to the originating error
    pub fn root(&self) -> &NetmongError {
        match self {
            NetmongError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the error means a referenced record is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), NetmongError::NotFound { .. })
    }

    /// Whether the caller is at fault (bad input or missing permission)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.root(),
            NetmongError::NotFound { .. }
                | NetmongError::Validation(_)
                | NetmongError::PermissionDenied(_)
        )
    }
}

/// Result type alias for netmong
pub type Result<T> = std::result::Result<T, NetmongError>;
