use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::{
    aggregate::Dataset,
    models::{
        AnalyticsStat, AuthToken, PostWithCommentCount, SocialComment, SocialPost, SocialUser,
        UserWithPostCount,
    },
};

/// How long a computed aggregate is served before it is rebuilt.
pub const CACHE_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    TopUsers,
    PopularPosts,
    LatestPosts,
}

impl CacheKey {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKey::TopUsers => "topUsers",
            CacheKey::PopularPosts => "popularPosts",
            CacheKey::LatestPosts => "latestPosts",
        }
    }
}

/// In-memory state shared by every request.
///
/// Each slot holds one value and writes replace it wholesale. The only
/// exception is the all-posts list, which accumulates every post ever
/// cached, deduplicated by id.
#[derive(Default)]
pub struct Store {
    token: RwLock<Option<AuthToken>>,
    users: RwLock<Vec<SocialUser>>,
    posts_by_user: DashMap<u64, Vec<SocialPost>>,
    all_posts: RwLock<Vec<SocialPost>>,
    comments_by_post: DashMap<u64, Vec<SocialComment>>,
    top_users: RwLock<Vec<UserWithPostCount>>,
    popular_posts: RwLock<Vec<PostWithCommentCount>>,
    latest_posts: RwLock<Vec<PostWithCommentCount>>,
    stats: RwLock<Option<AnalyticsStat>>,
    last_update: DashMap<CacheKey, DateTime<Utc>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_auth_token(&self, token: AuthToken) {
        *self.token.write().await = Some(token);
    }

    pub async fn auth_token(&self) -> Option<AuthToken> {
        self.token.read().await.clone()
    }

    pub async fn cache_users(&self, users: Vec<SocialUser>) {
        *self.users.write().await = users;
    }

    pub async fn users(&self) -> Vec<SocialUser> {
        self.users.read().await.clone()
    }

    pub async fn cache_posts(&self, user_id: u64, posts: Vec<SocialPost>) {
        {
            let mut all_posts = self.all_posts.write().await;
            let mut known: HashSet<u64> = all_posts.iter().map(|post| post.id).collect();
            for post in &posts {
                if known.insert(post.id) {
                    all_posts.push(post.clone());
                }
            }
        }

        self.posts_by_user.insert(user_id, posts);
    }

    pub fn posts(&self, user_id: u64) -> Vec<SocialPost> {
        self.posts_by_user
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub async fn all_posts(&self) -> Vec<SocialPost> {
        self.all_posts.read().await.clone()
    }

    pub fn cache_comments(&self, post_id: u64, comments: Vec<SocialComment>) {
        self.comments_by_post.insert(post_id, comments);
    }

    pub fn comments(&self, post_id: u64) -> Vec<SocialComment> {
        self.comments_by_post
            .get(&post_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn comment_count(&self, post_id: u64) -> usize {
        self.comments_by_post
            .get(&post_id)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }

    pub async fn set_top_users(&self, users: Vec<UserWithPostCount>) {
        *self.top_users.write().await = users;
    }

    pub async fn top_users(&self) -> Vec<UserWithPostCount> {
        self.top_users.read().await.clone()
    }

    pub async fn set_popular_posts(&self, posts: Vec<PostWithCommentCount>) {
        *self.popular_posts.write().await = posts;
    }

    pub async fn popular_posts(&self) -> Vec<PostWithCommentCount> {
        self.popular_posts.read().await.clone()
    }

    pub async fn set_latest_posts(&self, posts: Vec<PostWithCommentCount>) {
        *self.latest_posts.write().await = posts;
    }

    pub async fn latest_posts(&self) -> Vec<PostWithCommentCount> {
        self.latest_posts.read().await.clone()
    }

    pub async fn set_stats(&self, stats: AnalyticsStat) {
        *self.stats.write().await = Some(stats);
    }

    pub async fn stats(&self) -> Option<AnalyticsStat> {
        *self.stats.read().await
    }

    pub fn set_last_update(&self, key: CacheKey, at: DateTime<Utc>) {
        self.last_update.insert(key, at);
    }

    pub fn last_update(&self, key: CacheKey) -> Option<DateTime<Utc>> {
        self.last_update.get(&key).map(|entry| *entry.value())
    }

    /// True when `key` was never refreshed or its last refresh is older
    /// than the TTL as of `now`.
    pub fn is_stale(&self, key: CacheKey, now: DateTime<Utc>) -> bool {
        match self.last_update(key) {
            Some(at) => now.signed_duration_since(at) > Duration::minutes(CACHE_TTL_MINUTES),
            None => true,
        }
    }

    /// Copies the base collections out for aggregation.
    pub async fn dataset(&self) -> Dataset {
        let users = self.users().await;
        let posts = self.all_posts().await;
        let posts_by_user: HashMap<u64, Vec<SocialPost>> = self
            .posts_by_user
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        let comment_counts: HashMap<u64, usize> = self
            .comments_by_post
            .iter()
            .map(|entry| (*entry.key(), entry.value().len()))
            .collect();

        Dataset {
            users,
            posts,
            posts_by_user,
            comment_counts,
        }
    }
}
