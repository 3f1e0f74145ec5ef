use serde::{Deserialize, Serialize};

use super::{null_as_default, Metadata};

/// A user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "absolute_url")]
    pub url: Option<String>,
    pub date_joined: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// First and last name when set, username otherwise.
    pub name: Option<String>,
    pub username: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
    pub timezone: Option<String>,
    pub is_staff: Option<bool>,
    /// Only visible to sufficiently privileged credentials.
    pub email: Option<String>,
}

/// Supporters are plain user profiles.
pub type Supporter = User;

/// Response to `GET /projects/{id}/supporters`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListSupporterResponse {
    pub meta: Option<Metadata>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supporters: Vec<Supporter>,
}
