//! Creator profiles.

use crate::ids::CreatorId;
use serde::{Deserialize, Serialize};

/// A creator profile, joined onto every fetched product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Creator {
    pub id: CreatorId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl Creator {
    pub fn new(id: impl Into<CreatorId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            display_name: None,
            avatar_url: None,
            is_verified: false,
        }
    }

    /// Name to show in listings: display name if set, otherwise `@username`.
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("@{}", self.username),
        }
    }
}
