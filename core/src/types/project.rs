use std::fmt;

use serde::{Deserialize, Serialize};

use super::{null_as_default, Metadata};

/// Which of a user's projects to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProjectFilter {
    Created,
    Followed,
    Supported,
    /// No filter; every project the user is related to.
    #[default]
    All,
}

impl ProjectFilter {
    /// Value of the `state` query parameter. Empty for `All`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectFilter::Created => "created",
            ProjectFilter::Followed => "followed",
            ProjectFilter::Supported => "supported",
            ProjectFilter::All => "",
        }
    }
}

impl fmt::Display for ProjectFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response to `GET /users/{id}/projects`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListProjectResponse {
    pub meta: Option<Metadata>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
}

/// Response to `GET /projects/{id}/rewards`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRewardResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rewards: Vec<Reward>,
}

/// A crowdfunding project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(rename = "absolute_url")]
    pub url: Option<String>,
    pub goal: Option<i64>,
    pub goal_raised: Option<bool>,
    pub amount_raised: Option<i64>,
    #[serde(rename = "comments_count")]
    pub comment_count: Option<u64>,
    pub committed: Option<i64>,
    pub currency: Option<String>,
    pub currency_display: Option<String>,
    pub country: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub finished: Option<bool>,
    pub slug: Option<String>,
    pub supporters_count: Option<u64>,
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rewards: Vec<Reward>,
    pub is_online: Option<bool>,
    pub lang: Option<String>,
    pub news_count: Option<u64>,
    pub percent: Option<i64>,
}

impl Project {
    /// Whether `identifier` is this project's slug or decimal id.
    pub fn matches(&self, identifier: &str) -> bool {
        self.slug.as_deref() == Some(identifier) || self.id.to_string() == identifier
    }
}

/// A reward tier offered by a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: Option<u64>,
    pub available: Option<bool>,
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub stock_available: Option<i64>,
    pub stock_taken: Option<i64>,
    pub description_de: Option<String>,
    pub description_en: Option<String>,
    pub description_es: Option<String>,
    pub description_fr: Option<String>,
    pub description_it: Option<String>,
    pub description_nl: Option<String>,
    pub description_pt: Option<String>,
}

impl Reward {
    /// First non-empty description, trying en, fr, de, es, it, nl, pt in that
    /// order. Empty when no translation is set.
    pub fn description(&self) -> &str {
        [
            &self.description_en,
            &self.description_fr,
            &self.description_de,
            &self.description_es,
            &self.description_it,
            &self.description_nl,
            &self.description_pt,
        ]
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .map_or("", String::as_str)
    }
}
