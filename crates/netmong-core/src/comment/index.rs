//! Comment indexing for tree lookups

use super::model::Comment;
use crate::types::{CommentId, PostId};
use std::collections::HashMap;

/// Secondary index over a comment table.
///
/// Id lists are kept in insertion order, which is creation order because ids are
/// handed out sequentially.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    /// Root comments by post
    roots_by_post: HashMap<PostId, Vec<CommentId>>,
    /// Direct replies by parent comment
    children_by_parent: HashMap<CommentId, Vec<CommentId>>,
}

impl CommentIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment to the index
    pub fn add(&mut self, comment: &Comment) {
        match comment.parent_id() {
            None => self
                .roots_by_post
                .entry(comment.post_id())
                .or_default()
                .push(comment.id()),
            Some(parent_id) => self
                .children_by_parent
                .entry(parent_id)
                .or_default()
                .push(comment.id()),
        }
    }

    /// Root comment ids of a post
    pub fn roots_of_post(&self, post_id: PostId) -> &[CommentId] {
        self.roots_by_post
            .get(&post_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Direct reply ids of a comment
    pub fn children_of(&self, parent_id: CommentId) -> &[CommentId] {
        self.children_by_parent
            .get(&parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Clear the entire index
    pub fn clear(&mut self) {
        self.roots_by_post.clear();
        self.children_by_parent.clear();
    }

    /// Rebuild index from comments given in creation order
    pub fn rebuild<'a>(&mut self, comments: impl IntoIterator<Item = &'a Comment>) {
        self.clear();
        for comment in comments {
            self.add(comment);
        }
    }
}
