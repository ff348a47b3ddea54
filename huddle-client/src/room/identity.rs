use huddle_core::Username;

/// The authentication collaborator as seen by the call core.
pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is logged in.
    fn current_identity(&self) -> Option<Username>;
}

/// Fixed identity, for callers that authenticated elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<Username>);

impl StaticIdentity {
    pub fn new(username: impl Into<Username>) -> Self {
        Self(Some(username.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<Username> {
        self.0.clone().filter(|name| !name.is_blank())
    }
}
