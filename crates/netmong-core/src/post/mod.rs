//! Post domain
//!
//! Members, posts, likes and reports, the repository traits storage backends
//! implement, and the services built on them.

pub mod model;
pub mod repository;
pub mod search;
mod service;
mod like;
mod report;

pub use model::*;
pub use repository::{
    LikeRepository, MemberLookup, MemberRepository, PostLookup, PostRepository, ReportRepository,
};
pub use search::{search_posts, SearchCategory, SearchStrategy};
pub use service::PostService;
pub use like::LikeService;
pub use report::ReportService;
