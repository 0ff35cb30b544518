//! Presentation of a single story.

use chrono::{Local, TimeZone};
use glimpse_core::models::FeedStory;
use serde::Serialize;
use uuid::Uuid;

/// What the story viewer shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryView {
    pub story_id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    /// Shown in place of a missing avatar.
    pub avatar_initial: String,
    /// Creation time of day, `HH:MM`.
    pub time_of_day: String,
    pub image_url: String,
    pub caption: Option<String>,
}

impl StoryView {
    /// Present a story in the machine's local time zone.
    pub fn present(story: &FeedStory) -> Self {
        Self::present_in(story, &Local)
    }

    pub fn present_in<Tz>(story: &FeedStory, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let username = story.profile.username.clone();
        let avatar_initial = username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();

        Self {
            story_id: story.id,
            avatar_url: story.profile.avatar_url.clone(),
            avatar_initial,
            time_of_day: story
                .created_at
                .with_timezone(tz)
                .format("%H:%M")
                .to_string(),
            image_url: story.image_url.clone(),
            caption: story.caption.clone(),
            username,
        }
    }
}

/// Open/closed state of the viewer dialog.
#[derive(Debug, Default)]
pub struct StoryViewer {
    current: Option<StoryView>,
}

impl StoryViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, story: &FeedStory) -> &StoryView {
        self.current.insert(StoryView::present(story))
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&StoryView> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use glimpse_core::models::ProfileSummary;

    fn story(username: &str) -> FeedStory {
        FeedStory {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            image_url: "https://storage.test/media/stories/a.jpg".to_string(),
            caption: Some("golden hour".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 18, 7, 41).unwrap(),
            profile: ProfileSummary {
                username: username.to_string(),
                avatar_url: None,
            },
        }
    }

    #[test]
    fn time_of_day_uses_the_given_zone() {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let view = StoryView::present_in(&story("ada"), &paris);

        assert_eq!(view.time_of_day, "20:07");
        assert_eq!(view.caption.as_deref(), Some("golden hour"));
    }

    #[test]
    fn avatar_initial_is_upper_cased() {
        let view = StoryView::present_in(&story("émile"), &Utc);
        assert_eq!(view.avatar_initial, "É");
        assert_eq!(view.username, "émile");
    }

    #[test]
    fn viewer_opens_and_closes() {
        let mut viewer = StoryViewer::new();
        assert!(!viewer.is_open());

        let id = viewer.open(&story("ada")).story_id;
        assert_eq!(viewer.current().map(|v| v.story_id), Some(id));

        viewer.close();
        assert!(viewer.current().is_none());
    }
}
