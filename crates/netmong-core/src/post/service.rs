//! Post service
//!
//! Upload, edit and removal of posts plus the paged listings. Only the member
//! who wrote a post may change or delete it.

use super::model::{Member, NewPost, Post, PostDetail, PostRequest};
use super::repository::{LikeRepository, MemberLookup, PostRepository};
use super::search;
use crate::config::PostConfig;
use crate::error::{Entity, NetmongError, Result};
use crate::types::{Page, PageRequest, PostId};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const MAX_TITLE_LENGTH: usize = 100;

/// Service for posts
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    members: Arc<dyn MemberLookup>,
    likes: Arc<dyn LikeRepository>,
    config: PostConfig,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        members: Arc<dyn MemberLookup>,
        likes: Arc<dyn LikeRepository>,
        config: PostConfig,
    ) -> Self {
        Self {
            posts,
            members,
            likes,
            config,
        }
    }

    /// Request for the 1-based page `number` at the configured page size
    pub fn page(&self, number: usize) -> PageRequest {
        PageRequest::from_one_based(number, self.config.page_size)
    }

    /// Publish a new post written by `username`
    pub fn upload_post(&self, username: &str, request: PostRequest) -> Result<Post> {
        self.validate(&request)?;
        let member = self.find_member(username)?;

        let mut new_post = NewPost::new(request.title, request.content, &member);
        if let Some(name) = request.image_name.as_deref() {
            new_post = new_post.with_image_url(self.image_url(name)?);
        }

        let post = self.posts.insert_post(new_post)?;
        debug!("Uploaded post {} by {}", post.id, member.username);
        Ok(post)
    }

    /// A post with its like count, as seen by `viewer`
    pub fn get_detail(&self, post_id: PostId, viewer: Option<&str>) -> Result<PostDetail> {
        let post = self.find_post(post_id)?;
        let like_count = self.likes.count_likes(post_id)?;

        let is_liked = match viewer {
            Some(username) => match self.members.find_member_by_username(username)? {
                Some(member) => self.likes.exists_like(post_id, member.id)?,
                None => false,
            },
            None => false,
        };

        Ok(PostDetail {
            post,
            like_count,
            is_liked,
        })
    }

    /// Replace title, content and optionally the image of a post
    pub fn update_post(&self, actor: &str, post_id: PostId, request: PostRequest) -> Result<Post> {
        self.validate(&request)?;
        let mut post = self.find_post(post_id)?;
        ensure_owner(actor, &post, "edit")?;

        let image_url = match request.image_name.as_deref() {
            Some(name) => Some(self.image_url(name)?),
            None => None,
        };
        post.update(request.title, request.content, image_url);
        self.posts.save_post(&post)?;

        debug!("Updated post {}", post_id);
        Ok(post)
    }

    /// Remove a post along with its likes and reports
    pub fn delete_post(&self, actor: &str, post_id: PostId) -> Result<()> {
        let post = self.find_post(post_id)?;
        ensure_owner(actor, &post, "delete")?;

        self.posts.delete_post(post_id)?;
        debug!("Deleted post {}", post_id);
        Ok(())
    }

    /// All posts, newest first
    pub fn view_posts(&self, page: PageRequest) -> Result<Page<Post>> {
        self.posts.list_posts(page)
    }

    /// Posts written by one member, newest first
    pub fn view_member_posts(&self, username: &str, page: PageRequest) -> Result<Page<Post>> {
        let member = self.find_member(username)?;
        self.posts.posts_of_member(member.id, page)
    }

    /// Posts matching `word` under a category label
    pub fn search_posts(&self, label: &str, word: &str, page: PageRequest) -> Result<Page<Post>> {
        search::search_posts(self.posts.as_ref(), label, word, page)
    }

    fn find_post(&self, post_id: PostId) -> Result<Post> {
        self.posts
            .find_post(post_id)?
            .ok_or_else(|| NetmongError::not_found(Entity::Post, post_id))
    }

    fn find_member(&self, username: &str) -> Result<Member> {
        self.members
            .find_member_by_username(username)?
            .ok_or_else(|| NetmongError::not_found(Entity::Member, username))
    }

    fn validate(&self, request: &PostRequest) -> Result<()> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(NetmongError::Validation("Post title cannot be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(NetmongError::Validation(format!(
                "Post title exceeds maximum length of {} characters",
                MAX_TITLE_LENGTH
            )));
        }

        let content = request.content.trim();
        if content.is_empty() {
            return Err(NetmongError::Validation("Post content cannot be empty".to_string()));
        }
        if content.chars().count() > self.config.max_content_length {
            return Err(NetmongError::Validation(format!(
                "Post content exceeds maximum length of {} characters",
                self.config.max_content_length
            )));
        }

        Ok(())
    }

    /// Public URL under which an uploaded image is served
    fn image_url(&self, file_name: &str) -> Result<String> {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| NetmongError::Validation(format!("Invalid image name: {}", file_name)))?;

        Ok(format!(
            "{}/{}/{}_{}",
            self.config.domain.trim_end_matches('/'),
            self.config.image_dir.trim_matches('/'),
            Uuid::new_v4(),
            name
        ))
    }
}

fn ensure_owner(actor: &str, post: &Post, action: &str) -> Result<()> {
    if post.is_written_by(actor) {
        Ok(())
    } else {
        Err(NetmongError::PermissionDenied(format!(
            "{} may not {} post {} written by {}",
            actor, action, post.id, post.writer
        )))
    }
}
