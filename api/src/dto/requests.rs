use serde::{Deserialize, Deserializer, de};
use std::{fmt, str::FromStr};
use validator::Validate;

use crate::aggregate::PostKind;

/// Body of `POST /api/auth/authenticate`.
#[derive(Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub name: String,
    pub roll_no: String,
    pub access_code: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub client_secret: String,
}

// Credentials stay out of logs.
impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("roll_no", &self.roll_no)
            .field("access_code", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// `GET /api/social/posts?type=popular|latest&page=N`
///
/// Missing or empty parameters fall back to `popular` and page 1.
#[derive(Debug, Validate, Deserialize)]
pub struct PostsQuery {
    #[serde(default, rename = "type", deserialize_with = "kind_or_popular")]
    pub kind: PostKind,
    #[serde(default = "default_page", deserialize_with = "page_or_first")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

fn kind_or_popular<'de, D>(deserializer: D) -> Result<PostKind, D::Error>
where
    D: Deserializer<'de>,
{
    blank_or(deserializer, PostKind::default())
}

fn page_or_first<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    blank_or(deserializer, default_page())
}

fn blank_or<'de, D, T>(deserializer: D, default: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::Uri};

    fn query(uri: &'static str) -> Result<PostsQuery, String> {
        let uri = Uri::from_static(uri);
        Query::<PostsQuery>::try_from_uri(&uri)
            .map(|Query(query)| query)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn missing_parameters_use_defaults() {
        let parsed = query("/api/social/posts").unwrap();

        assert_eq!(parsed.kind, PostKind::Popular);
        assert_eq!(parsed.page, 1);
    }

    #[test]
    fn empty_parameters_use_defaults() {
        let parsed = query("/api/social/posts?type=&page=").unwrap();

        assert_eq!(parsed.kind, PostKind::Popular);
        assert_eq!(parsed.page, 1);
    }

    #[test]
    fn explicit_parameters_are_parsed() {
        let parsed = query("/api/social/posts?type=latest&page=3").unwrap();

        assert_eq!(parsed.kind, PostKind::Latest);
        assert_eq!(parsed.page, 3);
    }

    #[test]
    fn unknown_type_and_non_numeric_page_are_rejected() {
        assert!(query("/api/social/posts?type=trending").is_err());
        assert!(query("/api/social/posts?page=two").is_err());
    }

    #[test]
    fn zero_page_fails_validation() {
        let parsed = query("/api/social/posts?page=0").unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn debug_output_hides_credentials() {
        let request = AuthRequest {
            email: "jane@example.com".into(),
            name: "Jane".into(),
            roll_no: "R1".into(),
            access_code: "secret-code".into(),
            client_id: "client-id".into(),
            client_secret: "secret-value".into(),
        };
        let rendered = format!("{request:?}");

        assert!(rendered.contains("jane@example.com"));
        assert!(!rendered.contains("secret-code"));
        assert!(!rendered.contains("secret-value"));
    }
}
