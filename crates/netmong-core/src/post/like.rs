//! Likes on posts

use super::model::{Like, Member, Post};
use super::repository::{LikeRepository, MemberLookup, PostLookup};
use crate::error::{Entity, NetmongError, Result};
use crate::types::PostId;
use std::sync::Arc;
use tracing::debug;

/// Service for liking and unliking posts
pub struct LikeService {
    posts: Arc<dyn PostLookup>,
    members: Arc<dyn MemberLookup>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(
        posts: Arc<dyn PostLookup>,
        members: Arc<dyn MemberLookup>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            posts,
            members,
            likes,
        }
    }

    /// Like a post. A member can like a post once.
    pub fn add_like(&self, post_id: PostId, username: &str) -> Result<usize> {
        let (post, member) = self.resolve(post_id, username)?;

        if self.likes.exists_like(post.id, member.id)? {
            return Err(NetmongError::Validation(format!(
                "{} already likes post {}",
                member.username, post.id
            )));
        }

        self.likes.insert_like(Like::new(post.id, member.id))?;
        debug!("{} liked post {}", member.username, post.id);
        self.likes.count_likes(post.id)
    }

    /// Withdraw a like. Removing a like that does not exist is a no-op.
    pub fn remove_like(&self, post_id: PostId, username: &str) -> Result<usize> {
        let (post, member) = self.resolve(post_id, username)?;

        if self.likes.delete_like(post.id, member.id)? {
            debug!("{} unliked post {}", member.username, post.id);
        }
        self.likes.count_likes(post.id)
    }

    pub fn count_likes(&self, post_id: PostId) -> Result<usize> {
        if self.posts.find_post(post_id)?.is_none() {
            return Err(NetmongError::not_found(Entity::Post, post_id));
        }
        self.likes.count_likes(post_id)
    }

    fn resolve(&self, post_id: PostId, username: &str) -> Result<(Post, Member)> {
        let post = self
            .posts
            .find_post(post_id)?
            .ok_or_else(|| NetmongError::not_found(Entity::Post, post_id))?;
        let member = self
            .members
            .find_member_by_username(username)?
            .ok_or_else(|| NetmongError::not_found(Entity::Member, username))?;
        Ok((post, member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::model::NewPost;
    use crate::post::repository::memory::MemoryDirectory;
    use crate::post::repository::{MemberRepository, PostRepository};

    fn setup() -> (LikeService, PostId) {
        let directory = Arc::new(MemoryDirectory::new());
        let alice = directory.insert_member("alice").unwrap();
        directory.insert_member("bob").unwrap();
        let post = directory.insert_post(NewPost::new("walk", "park", &alice)).unwrap();
        let service = LikeService::new(directory.clone(), directory.clone(), directory);
        (service, post.id)
    }

    #[test]
    fn test_like_and_unlike() {
        let (service, post_id) = setup();

        assert_eq!(service.add_like(post_id, "bob").unwrap(), 1);
        assert_eq!(service.add_like(post_id, "alice").unwrap(), 2);
        assert_eq!(service.remove_like(post_id, "bob").unwrap(), 1);
        assert_eq!(service.count_likes(post_id).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_like_rejected() {
        let (service, post_id) = setup();
        service.add_like(post_id, "bob").unwrap();

        let err = service.add_like(post_id, "bob").unwrap_err();
        assert!(matches!(err, NetmongError::Validation(_)));
        assert_eq!(service.count_likes(post_id).unwrap(), 1);
    }

    #[test]
    fn test_remove_missing_like_is_noop() {
        let (service, post_id) = setup();
        assert_eq!(service.remove_like(post_id, "bob").unwrap(), 0);
    }

    #[test]
    fn test_unknown_post_or_member() {
        let (service, post_id) = setup();
        assert!(service.add_like(PostId(9), "bob").unwrap_err().is_not_found());
        assert!(service.add_like(post_id, "mallory").unwrap_err().is_not_found());
        assert!(service.count_likes(PostId(9)).unwrap_err().is_not_found());
    }
}
