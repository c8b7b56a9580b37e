//! Member, post, like and report tables

use netmong_core::error::{Entity, NetmongError, Result};
use netmong_core::post::{Like, Member, NewPost, Post, Report};
use netmong_core::types::{MemberId, Page, PageRequest, PostId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the store keeps apart from comments
#[derive(Debug, Clone)]
pub struct Records {
    members: BTreeMap<MemberId, Member>,
    posts: BTreeMap<PostId, Post>,
    likes: Vec<Like>,
    reports: Vec<Report>,
    next_member_id: MemberId,
    next_post_id: PostId,
}

impl Records {
    pub fn new() -> Self {
        Self {
            members: BTreeMap::new(),
            posts: BTreeMap::new(),
            likes: Vec::new(),
            reports: Vec::new(),
            next_member_id: MemberId(1),
            next_post_id: PostId(1),
        }
    }

    /// Register a member under a fresh id; usernames are unique
    pub fn insert_member(&mut self, username: &str) -> Result<Member> {
        let username = username.trim();
        if username.is_empty() {
            return Err(NetmongError::Validation("Username cannot be empty".to_string()));
        }
        if self.member_by_username(username).is_some() {
            return Err(NetmongError::Validation(format!(
                "Username {} is already taken",
                username
            )));
        }

        let id = self.next_member_id;
        self.next_member_id = id.next()?;
        let member = Member::new(id, username);
        self.members.insert(id, member.clone());
        Ok(member)
    }

    pub fn member_by_username(&self, username: &str) -> Option<&Member> {
        self.members.values().find(|m| m.username == username)
    }

    /// Store a new post under a fresh id
    pub fn insert_post(&mut self, new_post: NewPost) -> Result<Post> {
        if !self.members.contains_key(&new_post.member_id) {
            return Err(NetmongError::not_found(Entity::Member, new_post.member_id));
        }

        let id = self.next_post_id;
        self.next_post_id = id.next()?;
        let post = new_post.assign(id);
        self.posts.insert(id, post.clone());
        Ok(post)
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&id)
    }

    /// Overwrite an existing post
    pub fn save_post(&mut self, post: &Post) -> Result<()> {
        match self.posts.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(())
            }
            None => Err(NetmongError::not_found(Entity::Post, post.id)),
        }
    }

    /// Remove a post with its likes and reports. Returns whether it existed.
    pub fn delete_post(&mut self, id: PostId) -> bool {
        let existed = self.posts.remove(&id).is_some();
        self.likes.retain(|l| l.post_id != id);
        self.reports.retain(|r| r.post_id != id);
        existed
    }

    /// Posts passing `filter`, newest first
    pub fn posts_where(&self, filter: impl Fn(&Post) -> bool, page: PageRequest) -> Page<Post> {
        let posts: Vec<Post> = self
            .posts
            .values()
            .rev()
            .filter(|p| filter(p))
            .cloned()
            .collect();
        page.slice(posts)
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn insert_like(&mut self, like: Like) -> Result<()> {
        if self.has_like(like.post_id, like.member_id) {
            return Err(NetmongError::Validation(format!(
                "Member {} already likes post {}",
                like.member_id, like.post_id
            )));
        }
        self.likes.push(like);
        Ok(())
    }

    pub fn delete_like(&mut self, post_id: PostId, member_id: MemberId) -> bool {
        let before = self.likes.len();
        self.likes
            .retain(|l| !(l.post_id == post_id && l.member_id == member_id));
        self.likes.len() != before
    }

    pub fn has_like(&self, post_id: PostId, member_id: MemberId) -> bool {
        self.likes
            .iter()
            .any(|l| l.post_id == post_id && l.member_id == member_id)
    }

    pub fn like_count(&self, post_id: PostId) -> usize {
        self.likes.iter().filter(|l| l.post_id == post_id).count()
    }

    pub fn insert_report(&mut self, report: Report) -> Result<()> {
        if self.has_report(report.reporter_id, report.post_id) {
            return Err(NetmongError::Validation(format!(
                "Member {} has already reported post {}",
                report.reporter_id, report.post_id
            )));
        }
        self.reports.push(report);
        Ok(())
    }

    pub fn has_report(&self, reporter_id: MemberId, post_id: PostId) -> bool {
        self.reports
            .iter()
            .any(|r| r.reporter_id == reporter_id && r.post_id == post_id)
    }

    pub fn report_count(&self, post_id: PostId) -> usize {
        self.reports.iter().filter(|r| r.post_id == post_id).count()
    }
}

impl Default for Records {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct RecordsRef<'a> {
    next_member_id: MemberId,
    next_post_id: PostId,
    members: Vec<&'a Member>,
    posts: Vec<&'a Post>,
    likes: &'a [Like],
    reports: &'a [Report],
}

#[derive(Deserialize)]
struct RecordsHelper {
    #[serde(default)]
    next_member_id: Option<MemberId>,
    #[serde(default)]
    next_post_id: Option<PostId>,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    likes: Vec<Like>,
    #[serde(default)]
    reports: Vec<Report>,
}

impl Serialize for Records {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RecordsRef {
            next_member_id: self.next_member_id,
            next_post_id: self.next_post_id,
            members: self.members.values().collect(),
            posts: self.posts.values().collect(),
            likes: &self.likes,
            reports: &self.reports,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Records {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = RecordsHelper::deserialize(deserializer)?;

        let members: BTreeMap<MemberId, Member> =
            helper.members.into_iter().map(|m| (m.id, m)).collect();
        let posts: BTreeMap<PostId, Post> = helper.posts.into_iter().map(|p| (p.id, p)).collect();

        // Deleted ids are never handed out again
        let after_member = match members.keys().next_back() {
            Some(last) => last.next().map_err(<D::Error as serde::de::Error>::custom)?,
            None => MemberId(1),
        };
        let after_post = match posts.keys().next_back() {
            Some(last) => last.next().map_err(<D::Error as serde::de::Error>::custom)?,
            None => PostId(1),
        };

        Ok(Self {
            members,
            posts,
            likes: helper.likes,
            reports: helper.reports,
            next_member_id: helper
                .next_member_id
                .map_or(after_member, |id| id.max(after_member)),
            next_post_id: helper.next_post_id.map_or(after_post, |id| id.max(after_post)),
        })
    }
}
