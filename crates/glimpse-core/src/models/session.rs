use uuid::Uuid;

/// The authenticated actor, passed explicitly into every flow that writes.
#[derive(Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: Uuid, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            access_token: access_token.into(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
