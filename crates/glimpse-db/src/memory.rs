//! In-process repositories.
//!
//! Rows are kept behind `Arc<Mutex<..>>` so clones share state. Failures can
//! be switched on to exercise the error paths of the flows built on top.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glimpse_core::models::{NewStory, Profile, ProfileUpdate, Session, Story, StoryWithProfile};
use glimpse_core::{AppError, Clock, SystemClock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::repository::{ProfileRepository, StoryRepository};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Story repository keeping rows in memory, joined against an
/// [`InMemoryProfileRepository`] for display fields.
#[derive(Clone)]
pub struct InMemoryStoryRepository {
    rows: Arc<Mutex<Vec<StoryWithProfile>>>,
    profiles: InMemoryProfileRepository,
    clock: Arc<dyn Clock>,
    fail_inserts: Arc<AtomicBool>,
    fail_lists: Arc<AtomicBool>,
    list_calls: Arc<AtomicUsize>,
}

impl Default for InMemoryStoryRepository {
    fn default() -> Self {
        Self::new(InMemoryProfileRepository::new(), Arc::new(SystemClock))
    }
}

impl InMemoryStoryRepository {
    pub fn new(profiles: InMemoryProfileRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            profiles,
            clock,
            fail_inserts: Arc::new(AtomicBool::new(false)),
            fail_lists: Arc::new(AtomicBool::new(false)),
            list_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a row as-is, e.g. with a creation time in the past.
    pub fn seed(&self, row: StoryWithProfile) {
        lock(&self.rows).push(row);
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Number of stored rows, expired ones included.
    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the feed has been queried.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    fn for_session(&self, _session: &Session) -> Arc<dyn StoryRepository> {
        Arc::new(self.clone())
    }

    async fn insert(&self, story: &NewStory) -> Result<Story, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Persist("Story insert rejected".to_string()));
        }

        let created = Story {
            id: Uuid::new_v4(),
            user_id: story.user_id,
            image_url: story.image_url.clone(),
            caption: story.caption.clone(),
            created_at: self.clock.now(),
        };

        let owner = self.profiles.snapshot(story.user_id);
        lock(&self.rows).push(StoryWithProfile {
            id: created.id,
            user_id: created.user_id,
            image_url: created.image_url.clone(),
            caption: created.caption.clone(),
            created_at: created.created_at,
            username: owner.as_ref().map(|p| p.username.clone()),
            avatar_url: owner.and_then(|p| p.avatar_url),
        });

        Ok(created)
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<StoryWithProfile>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AppError::Fetch("connection refused".to_string()));
        }

        let mut rows: Vec<StoryWithProfile> = lock(&self.rows)
            .iter()
            .filter(|row| row.created_at > since)
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep insertion order.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// Profile repository keeping rows in memory.
#[derive(Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<Uuid, Profile>>>,
    fail_updates: Arc<AtomicBool>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, profile: Profile) {
        lock(&self.profiles).insert(profile.id, profile);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    fn snapshot(&self, id: Uuid) -> Option<Profile> {
        lock(&self.profiles).get(&id).cloned()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    fn for_session(&self, _session: &Session) -> Arc<dyn ProfileRepository> {
        Arc::new(self.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.snapshot(id))
    }

    async fn update(&self, id: Uuid, update: &ProfileUpdate) -> Result<Profile, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Persist("Profile update rejected".to_string()));
        }

        let mut profiles = lock(&self.profiles);
        let username_taken = profiles
            .values()
            .any(|p| p.id != id && p.username == update.username);
        if username_taken {
            return Err(AppError::Persist(
                "duplicate key value violates unique constraint".to_string(),
            ));
        }

        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
        profile.username = update.username.clone();
        profile.full_name = update.full_name.clone();
        profile.bio = update.bio.clone();
        profile.avatar_url = update.avatar_url.clone();
        profile.updated_at = Some(update.updated_at);
        Ok(profile.clone())
    }
}
