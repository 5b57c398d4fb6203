use serde::{Deserialize, Serialize};

/// A ranked user as shown on the dashboard.
///
/// `join_date` and `trend` are display decoration, not analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithPostCount {
    pub id: u64,
    pub name: String,
    pub post_count: usize,
    pub comment_count: usize,
    pub join_date: String,
    pub avatar: String,
    pub trend: u32,
}

/// A ranked post with its author attached.
///
/// `created_at` and `trend` are display decoration, not analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithCommentCount {
    pub id: u64,
    pub userid: u64,
    pub user_name: String,
    pub user_avatar: String,
    pub content: String,
    pub comment_count: usize,
    pub created_at: String,
    pub trend: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPostAuthor {
    pub name: String,
    pub avatar: String,
}

/// A post listed under its author's page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPost {
    pub id: u64,
    pub userid: u64,
    pub content: String,
    pub user_data: UserPostAuthor,
    pub comment_count: usize,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStat {
    pub total_users: usize,
    pub total_posts: usize,
    pub total_comments: usize,
    pub avg_posts_per_user: f64,
}
