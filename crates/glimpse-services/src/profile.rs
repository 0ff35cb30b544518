//! Profile editing, including avatar replacement.

use std::sync::Arc;

use glimpse_core::models::{ImageFile, Profile, ProfileChanges, ProfileUpdate, Session};
use glimpse_core::{AppError, Clock};
use glimpse_db::ProfileRepository;
use glimpse_storage::Storage;

use crate::upload::{ImageUploader, UploadTarget};

pub const PROFILE_UPDATED_MESSAGE: &str = "Profile updated successfully!";
pub const PROFILE_UPDATE_FAILED_MESSAGE: &str = "Error updating profile";

#[derive(Clone)]
pub struct ProfileEditor {
    profiles: Arc<dyn ProfileRepository>,
    uploader: ImageUploader,
    target: UploadTarget,
    clock: Arc<dyn Clock>,
}

impl ProfileEditor {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        uploader: ImageUploader,
        avatar_bucket: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            uploader,
            target: UploadTarget::avatar(avatar_bucket),
            clock,
        }
    }

    /// The session user's profile.
    pub async fn load(&self, session: Option<&Session>) -> Result<Profile, AppError> {
        let session = session.ok_or(AppError::NotAuthenticated)?;
        self.profiles
            .for_session(session)
            .get(session.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    /// Upload a new avatar image and return its public URL. The profile
    /// itself is only changed by [`ProfileEditor::update`].
    pub async fn upload_avatar(
        &self,
        session: Option<&Session>,
        file: &ImageFile,
    ) -> Result<String, AppError> {
        let session = session.ok_or(AppError::NotAuthenticated)?;
        let uploaded = self
            .uploader
            .for_session(session)
            .upload(file, &self.target)
            .await?;
        Ok(uploaded.url)
    }

    /// Save edited fields over `current`.
    ///
    /// A replaced avatar's object is deleted first; failing to delete it is
    /// logged and does not stop the update.
    pub async fn update(
        &self,
        session: Option<&Session>,
        current: &Profile,
        changes: &ProfileChanges,
    ) -> Result<Profile, AppError> {
        let session = session.ok_or(AppError::NotAuthenticated)?;
        if current.id != session.user_id {
            return Err(AppError::NotAuthenticated);
        }
        if changes.username.trim().is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }

        if let Some(old) = current.avatar_url.as_deref().filter(|u| !u.is_empty()) {
            if old != changes.avatar_url {
                self.remove_avatar(session, old).await;
            }
        }

        let update = ProfileUpdate::from_changes(changes, self.clock.now());
        let profiles = self.profiles.for_session(session);
        match profiles.update(current.id, &update).await {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "{}", PROFILE_UPDATED_MESSAGE);
                Ok(profile)
            }
            Err(e) => {
                e.log("Profile update failed");
                Err(AppError::Persist(PROFILE_UPDATE_FAILED_MESSAGE.to_string()))
            }
        }
    }

    async fn remove_avatar(&self, session: &Session, url: &str) {
        let storage: Arc<dyn Storage> = self.uploader.storage().for_session(session);
        let Some(path) = storage.object_path_from_url(&self.target.bucket, url) else {
            tracing::debug!(url = %url, "Previous avatar is not in the avatar bucket");
            return;
        };

        match storage.remove(&self.target.bucket, &[path.clone()]).await {
            Ok(()) => tracing::info!(bucket = %self.target.bucket, key = %path, "Previous avatar removed"),
            Err(e) => tracing::warn!(
                bucket = %self.target.bucket,
                key = %path,
                error = %e,
                "Failed to remove previous avatar"
            ),
        }
    }
}
