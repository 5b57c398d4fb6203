use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocialUser {
    pub id: u64,
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub roll_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
}

impl SocialUser {
    /// Builds a user from an upstream name-only entry, filling the
    /// contact fields with placeholders derived from the id.
    pub fn from_name(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: format!("user{id}@example.com"),
            roll_no: format!("R00{id}"),
            access_code: None,
        }
    }
}
