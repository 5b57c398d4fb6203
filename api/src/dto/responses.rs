use serde::Serialize;

use crate::{
    aggregate::Pagination,
    models::{AnalyticsStat, PostWithCommentCount, SocialComment, UserPost, UserWithPostCount},
};

/// Result of `POST /api/auth/authenticate`, success or not.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: "Authentication failed".to_string(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_mode: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsResponse {
    pub has_credentials: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserWithPostCount>,
    /// Left out when the users come from cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<AnalyticsStat>,
}

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub posts: Vec<PostWithCommentCount>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<SocialComment>,
}

#[derive(Debug, Serialize)]
pub struct UserPostsResponse {
    pub posts: Vec<UserPost>,
}
