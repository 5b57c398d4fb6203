//! Sequential fetch → normalize → cache passes against the upstream API.
//!
//! Only the users listing is allowed to fail a pass. Per-user and per-post
//! fetches that fail are logged and skipped, and payloads the normalizer
//! rejects count as empty.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    models::{SocialComment, SocialUser},
    normalize::{self, NormalizeError},
    store::Store,
    upstream::{UpstreamClient, UpstreamError},
};

/// Counts from one refresh pass, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub failed_fetches: usize,
}

pub struct Loader<'a> {
    store: &'a Store,
    upstream: &'a UpstreamClient,
    token: &'a str,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a Store, upstream: &'a UpstreamClient, token: &'a str) -> Self {
        Self {
            store,
            upstream,
            token,
        }
    }

    /// Re-fetches users, every user's posts and every known post's
    /// comments, one call at a time.
    pub async fn refresh(&self) -> Result<RefreshSummary, UpstreamError> {
        let mut summary = RefreshSummary::default();

        let users = self.load_users().await?;
        summary.users = users.len();

        for user in &users {
            if !self.load_user_posts(user.id).await {
                summary.failed_fetches += 1;
            }
        }

        let posts = self.store.all_posts().await;
        summary.posts = posts.len();

        for post in &posts {
            match self.load_post_comments(post.id).await {
                Ok(comments) => summary.comments += comments.len(),
                Err(e) => {
                    warn!("Failed to fetch comments for post {}: {}", post.id, e);
                    summary.failed_fetches += 1;
                }
            }
        }

        info!(
            "Refreshed {} users, {} posts, {} comments ({} failed fetches)",
            summary.users, summary.posts, summary.comments, summary.failed_fetches
        );

        Ok(summary)
    }

    pub async fn load_users(&self) -> Result<Vec<SocialUser>, UpstreamError> {
        let payload = self.upstream.users(self.token).await?;
        log_shape(&payload, "users", "users listing");

        let users = accept_or_empty(normalize::normalize_users(&payload), "users listing");
        self.store.cache_users(users.clone()).await;

        Ok(users)
    }

    /// Returns false when the fetch itself failed; the cached posts for
    /// that user are then left as they were.
    async fn load_user_posts(&self, user_id: u64) -> bool {
        let payload = match self.upstream.user_posts(self.token, user_id).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to fetch posts for user {}: {}", user_id, e);
                return false;
            }
        };

        let context = format!("posts for user {user_id}");
        log_shape(&payload, "posts", &context);

        let posts = accept_or_empty(normalize::normalize_posts(&payload, user_id), &context);
        debug!("Parsed {} {}", posts.len(), context);
        self.store.cache_posts(user_id, posts).await;

        true
    }

    /// Fetches and caches the full comment list for one post.
    pub async fn load_post_comments(&self, post_id: u64) -> Result<Vec<SocialComment>, UpstreamError> {
        let payload = self.upstream.post_comments(self.token, post_id).await?;

        let context = format!("comments for post {post_id}");
        log_shape(&payload, "comments", &context);

        let comments = accept_or_empty(normalize::normalize_comments(&payload, post_id), &context);
        debug!("Parsed {} {}", comments.len(), context);
        self.store.cache_comments(post_id, comments.clone());

        Ok(comments)
    }
}

fn accept_or_empty<T>(result: Result<Vec<T>, NormalizeError>, context: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Discarding {}: {}", context, e);
        Vec::new()
    })
}

fn log_shape(payload: &Value, kind: &'static str, context: &str) {
    match normalize::shape_of(payload, kind) {
        Ok(shape) => debug!("Upstream {} payload shape: {:?}", context, shape),
        Err(_) => debug!("Upstream {} payload has an unexpected shape", context),
    }
}
