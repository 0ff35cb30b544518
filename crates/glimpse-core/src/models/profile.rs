use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row of the `profiles` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Edited profile fields as typed in the form. Empty strings mean "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: String,
    pub full_name: String,
    pub bio: String,
    pub avatar_url: String,
}

impl ProfileChanges {
    /// Pre-fill the form from an existing profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            full_name: profile.full_name.clone().unwrap_or_default(),
            bio: profile.bio.clone().unwrap_or_default(),
            avatar_url: profile.avatar_url.clone().unwrap_or_default(),
        }
    }
}

/// PATCH payload for a profile. Optional fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ProfileUpdate {
    pub fn from_changes(changes: &ProfileChanges, updated_at: DateTime<Utc>) -> Self {
        Self {
            username: changes.username.clone(),
            full_name: non_empty(&changes.full_name),
            bio: non_empty(&changes.bio),
            avatar_url: non_empty(&changes.avatar_url),
            updated_at,
        }
    }
}
