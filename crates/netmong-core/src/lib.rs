//! netmong-core - Core library for netmong
//!
//! This crate provides the business logic of the netmong social-posting backend:
//! the threaded comment tree with soft deletion, the post domain (search, owner
//! checks, likes, reports) and the storage contracts both are written against.

pub mod error;
pub mod types;
pub mod config;
pub mod comment;
pub mod post;

pub use error::{Entity, NetmongError, Result};
pub use types::*;
