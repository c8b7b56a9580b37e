//! In-memory comment table

use super::index::CommentIndex;
use super::model::{Comment, NewComment};
use crate::error::{Entity, NetmongError, Result};
use crate::types::{CommentId, PostId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All comments by id, with a tree index on the side
#[derive(Debug, Clone)]
pub struct CommentTable {
    comments: BTreeMap<CommentId, Comment>,
    next_id: CommentId,
    index: CommentIndex,
}

impl CommentTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            comments: BTreeMap::new(),
            next_id: CommentId(1),
            index: CommentIndex::new(),
        }
    }

    /// Store a new comment under the next id.
    ///
    /// A reply must point at an existing comment of the same post.
    pub fn insert(&mut self, new_comment: NewComment) -> Result<CommentId> {
        if let Some(parent_id) = new_comment.parent_id {
            let parent = self
                .comments
                .get(&parent_id)
                .ok_or_else(|| NetmongError::not_found(Entity::ParentComment, parent_id))?;

            if parent.post_id() != new_comment.post_id {
                return Err(NetmongError::Validation(format!(
                    "Reply to comment {} must belong to post {}, not {}",
                    parent_id,
                    parent.post_id(),
                    new_comment.post_id
                )));
            }
        }

        let id = self.next_id;
        self.next_id = id.next()?;

        let comment = new_comment.assign(id);
        self.index.add(&comment);
        self.comments.insert(id, comment);
        Ok(id)
    }

    /// Get a comment by ID
    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(&id)
    }

    /// Persist the mutable fields of an existing comment
    pub fn update(&mut self, comment: &Comment) -> Result<()> {
        let stored = self
            .comments
            .get_mut(&comment.id())
            .ok_or_else(|| NetmongError::not_found(Entity::Comment, comment.id()))?;

        stored.absorb_changes(comment);
        Ok(())
    }

    /// Set the deletion flag of a comment
    pub fn mark_deleted(&mut self, id: CommentId) -> Result<()> {
        let comment = self
            .comments
            .get_mut(&id)
            .ok_or_else(|| NetmongError::not_found(Entity::Comment, id))?;

        comment.mark_deleted();
        Ok(())
    }

    /// Root comments of a post in creation order
    pub fn roots_of_post(&self, post_id: PostId) -> Vec<&Comment> {
        self.resolve(self.index.roots_of_post(post_id))
    }

    /// Direct replies of a comment in creation order
    pub fn children_of(&self, parent_id: CommentId) -> Vec<&Comment> {
        self.resolve(self.index.children_of(parent_id))
    }

    fn resolve(&self, ids: &[CommentId]) -> Vec<&Comment> {
        ids.iter().filter_map(|id| self.comments.get(id)).collect()
    }

    /// All comments in creation order
    pub fn all_sorted(&self) -> Vec<&Comment> {
        self.comments.values().collect()
    }

    /// Get total comment count, deleted ones included
    pub fn count(&self) -> usize {
        self.comments.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Rebuild index (after deserialization)
    pub fn rebuild_index(&mut self) {
        self.index.rebuild(self.comments.values());
    }
}

impl Default for CommentTable {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct CommentTableRef<'a> {
    next_id: CommentId,
    comments: Vec<&'a Comment>,
}

#[derive(Deserialize)]
struct CommentTableHelper {
    #[serde(default)]
    next_id: Option<CommentId>,
    comments: Vec<Comment>,
}

impl Serialize for CommentTable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        CommentTableRef {
            next_id: self.next_id,
            comments: self.all_sorted(),
        }
        .serialize(serializer)
    }
}

// Custom deserialization to rebuild index
impl<'de> Deserialize<'de> for CommentTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = CommentTableHelper::deserialize(deserializer)?;

        let comments: BTreeMap<CommentId, Comment> = helper
            .comments
            .into_iter()
            .map(|c| (c.id(), c))
            .collect();

        // Never hand out an id that is already taken
        let after_last = match comments.keys().next_back() {
            Some(last) => last.next().map_err(<D::Error as serde::de::Error>::custom)?,
            None => CommentId(1),
        };
        let next_id = helper.next_id.map_or(after_last, |id| id.max(after_last));

        let mut table = Self {
            comments,
            next_id,
            index: CommentIndex::new(),
        };
        table.rebuild_index();
        Ok(table)
    }
}
