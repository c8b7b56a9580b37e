//! Comment system module
//!
//! Threaded comments on posts: the comment model, the transactional store
//! contract, the in-memory table stores build on, and the tree service.
//!
//! # Example
//!
//! ```ignore
//! use netmong_core::comment::CommentTreeService;
//!
//! let service = CommentTreeService::new(store.clone(), store.clone(), store);
//! let root = service.add_comment(post_id, "alice", "hello")?;
//! service.add_reply_to_comment(root.id, "bob", "hi back")?;
//!
//! for view in service.get_comments_of_post(post_id)? {
//!     println!("{} ({} replies)", view.content, view.children.len());
//! }
//! ```

pub mod model;
pub mod index;
pub mod table;
pub mod store;
pub mod validator;
pub mod view;
mod service;

pub use model::*;
pub use index::CommentIndex;
pub use table::CommentTable;
pub use store::{CommentStore, CommentTransaction, StagedTable};
pub use validator::CommentValidator;
pub use service::CommentTreeService;
