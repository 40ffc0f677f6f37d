use crate::auth::repo::PublicUser;

/// Client-side session: the signed token plus a cached copy of the user's
/// public profile. Owned explicitly by the [`ApiClient`](super::api::ApiClient)
/// and created/cleared on login/logout; nothing lives in ambient globals.
///
/// The token is the only authorization truth. The profile is a display
/// cache and may go stale without affecting what the server permits.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    profile: Option<PublicUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session from a previously persisted token, before the
    /// profile has been refreshed from the server.
    pub fn resume(token: String) -> Self {
        Self {
            token: Some(token),
            profile: None,
        }
    }

    pub fn install(&mut self, token: String, profile: PublicUser) {
        self.token = Some(token);
        self.profile = Some(profile);
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.profile = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn profile(&self) -> Option<&PublicUser> {
        self.profile.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Stale-but-available: a successful refresh replaces the cached
    /// profile, a failed one keeps whatever was cached rather than forcing
    /// a logout.
    pub fn apply_refresh<E>(&mut self, refreshed: Result<PublicUser, E>) {
        if let Ok(profile) = refreshed {
            self.profile = Some(profile);
        }
    }
}
