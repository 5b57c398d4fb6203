use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Bearer credential returned by the upstream auth endpoint.
///
/// Upstream has been seen answering in both snake_case and camelCase, so
/// both shapes are accepted. Expiry is recorded but never enforced.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthToken {
    Snake {
        token_type: String,
        access_token: String,
        #[serde(deserialize_with = "seconds")]
        expires_in: i64,
    },
    #[serde(rename_all = "camelCase")]
    Camel {
        token_type: String,
        access_token: String,
        #[serde(deserialize_with = "seconds")]
        expires_in: i64,
    },
}

impl AuthToken {
    pub fn demo() -> Self {
        AuthToken::Snake {
            token_type: "Bearer".into(),
            access_token: "demo_access_token".into(),
            expires_in: 3600,
        }
    }

    pub fn access_token(&self) -> &str {
        match self {
            AuthToken::Snake { access_token, .. } | AuthToken::Camel { access_token, .. } => {
                access_token
            }
        }
    }

    pub fn token_type(&self) -> &str {
        match self {
            AuthToken::Snake { token_type, .. } | AuthToken::Camel { token_type, .. } => token_type,
        }
    }

    pub fn expires_in(&self) -> i64 {
        match self {
            AuthToken::Snake { expires_in, .. } | AuthToken::Camel { expires_in, .. } => *expires_in,
        }
    }
}

// Never print the credential itself.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("token_type", &self.token_type())
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in())
            .finish()
    }
}

fn seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
