//! Post reports

use super::model::Report;
use super::repository::{MemberLookup, PostLookup, ReportRepository};
use crate::error::{Entity, NetmongError, Result};
use crate::types::PostId;
use std::sync::Arc;
use tracing::{debug, info};

/// Service for reporting posts
pub struct ReportService {
    posts: Arc<dyn PostLookup>,
    members: Arc<dyn MemberLookup>,
    reports: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(
        posts: Arc<dyn PostLookup>,
        members: Arc<dyn MemberLookup>,
        reports: Arc<dyn ReportRepository>,
    ) -> Self {
        Self {
            posts,
            members,
            reports,
        }
    }

    /// File a report against a post.
    ///
    /// Each member may report a given post once and never their own post.
    /// Returns the number of reports the post has collected.
    pub fn report_post(&self, post_id: PostId, username: &str, reason: Option<&str>) -> Result<usize> {
        let post = self
            .posts
            .find_post(post_id)?
            .ok_or_else(|| NetmongError::not_found(Entity::Post, post_id))?;
        let member = self
            .members
            .find_member_by_username(username)?
            .ok_or_else(|| NetmongError::not_found(Entity::Member, username))?;

        if post.member_id == member.id {
            return Err(NetmongError::Validation(
                "You cannot report your own post".to_string(),
            ));
        }
        if self.reports.exists_report(member.id, post.id)? {
            return Err(NetmongError::Validation(format!(
                "{} has already reported post {}",
                member.username, post.id
            )));
        }

        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        self.reports.insert_report(Report::new(post.id, member.id, reason))?;

        let count = self.reports.count_reports(post.id)?;
        debug!("{} reported post {}", member.username, post.id);
        if count > 1 {
            info!("Post {} has {} reports", post.id, count);
        }
        Ok(count)
    }
}
