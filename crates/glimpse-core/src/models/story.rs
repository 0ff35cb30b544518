use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::UNKNOWN_USERNAME;

/// A persisted story row (`stories` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a story. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStory {
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
}

/// Row of the denormalized `stories_with_profiles` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryWithProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Display fields of a story's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub username: String,
    pub avatar_url: Option<String>,
}

/// A story as shown in the feed: the story plus its owner's display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedStory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub profile: ProfileSummary,
}

impl From<StoryWithProfile> for FeedStory {
    fn from(row: StoryWithProfile) -> Self {
        let username = row
            .username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| UNKNOWN_USERNAME.to_string());
        let avatar_url = row.avatar_url.filter(|u| !u.is_empty());

        FeedStory {
            id: row.id,
            user_id: row.user_id,
            image_url: row.image_url,
            caption: row.caption,
            created_at: row.created_at,
            profile: ProfileSummary {
                username,
                avatar_url,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: Option<&str>, avatar_url: Option<&str>) -> StoryWithProfile {
        StoryWithProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            image_url: "https://cdn.test/media/stories/a.jpg".to_string(),
            caption: None,
            created_at: Utc::now(),
            username: username.map(String::from),
            avatar_url: avatar_url.map(String::from),
        }
    }

    #[test]
    fn missing_username_is_shown_as_unknown() {
        let story = FeedStory::from(row(None, None));
        assert_eq!(story.profile.username, "Unknown");

        let story = FeedStory::from(row(Some(""), Some("")));
        assert_eq!(story.profile.username, "Unknown");
        assert_eq!(story.profile.avatar_url, None);
    }

    #[test]
    fn view_row_deserializes_without_profile_columns() {
        let json = serde_json::json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "user_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "image_url": "https://cdn.test/x.jpg",
            "caption": null,
            "created_at": "2026-10-19T08:30:00+00:00"
        });
        let row: StoryWithProfile = serde_json::from_value(json).unwrap();
        assert_eq!(row.username, None);
        assert_eq!(FeedStory::from(row).profile.username, "Unknown");
    }
}
