//! netmong-storage - Storage library for netmong
//!
//! This crate provides the store behind the netmong services: comment, post,
//! member, like and report tables held in memory and optionally mirrored to a
//! JSON snapshot file.

mod records;
mod snapshot;
mod store;

pub use records::Records;
pub use snapshot::{SnapshotFile, CURRENT_SCHEMA_VERSION};
pub use store::{default_data_file, Store};
