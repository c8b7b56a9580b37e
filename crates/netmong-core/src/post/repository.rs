//! Post, member, like and report storage traits

use super::model::{Like, Member, NewPost, Post, Report};
use crate::error::Result;
use crate::types::{MemberId, Page, PageRequest, PostId};

/// Lookup of posts by id
pub trait PostLookup: Send + Sync {
    fn find_post(&self, id: PostId) -> Result<Option<Post>>;
}

/// Lookup of members by username
pub trait MemberLookup: Send + Sync {
    fn find_member_by_username(&self, username: &str) -> Result<Option<Member>>;
}

/// Trait for post storage implementations.
///
/// Listings are ordered newest first.
pub trait PostRepository: PostLookup {
    /// Store a new post under a fresh id
    fn insert_post(&self, post: NewPost) -> Result<Post>;

    /// Overwrite an existing post
    fn save_post(&self, post: &Post) -> Result<()>;

    /// Remove a post together with its likes and reports
    fn delete_post(&self, id: PostId) -> Result<()>;

    fn list_posts(&self, page: PageRequest) -> Result<Page<Post>>;

    fn find_by_writer_containing(&self, word: &str, page: PageRequest) -> Result<Page<Post>>;

    fn find_by_content_containing(&self, word: &str, page: PageRequest) -> Result<Page<Post>>;

    fn posts_of_member(&self, member_id: MemberId, page: PageRequest) -> Result<Page<Post>>;
}

/// Trait for member storage implementations
pub trait MemberRepository: MemberLookup {
    /// Register a member; usernames are unique
    fn insert_member(&self, username: &str) -> Result<Member>;
}

/// Trait for like storage implementations
pub trait LikeRepository: Send + Sync {
    fn insert_like(&self, like: Like) -> Result<()>;

    /// Remove a like, returning whether one existed
    fn delete_like(&self, post_id: PostId, member_id: MemberId) -> Result<bool>;

    fn exists_like(&self, post_id: PostId, member_id: MemberId) -> Result<bool>;

    fn count_likes(&self, post_id: PostId) -> Result<usize>;
}

/// Trait for report storage implementations
pub trait ReportRepository: Send + Sync {
    fn insert_report(&self, report: Report) -> Result<()>;

    fn exists_report(&self, reporter_id: MemberId, post_id: PostId) -> Result<bool>;

    fn count_reports(&self, post_id: PostId) -> Result<usize>;
}
