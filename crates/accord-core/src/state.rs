//! Session-scoped derived state.

use std::sync::RwLock;

use crate::event::SelfProfile;

/// Mutable state owned by a session and shared with its frame interceptor
/// chain. Interceptors enrich this state; they never dispatch events.
#[derive(Debug, Default)]
pub struct SessionState {
    self_profile: RwLock<Option<SelfProfile>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current self profile, if known.
    pub fn self_profile(&self) -> Option<SelfProfile> {
        self.self_profile
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the self profile.
    pub fn set_self_profile(&self, profile: SelfProfile) {
        *self
            .self_profile
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(profile);
    }

    /// Apply a mutation to the self profile if one is set. Returns whether a
    /// profile was present.
    pub fn update_self_profile(&self, f: impl FnOnce(&mut SelfProfile)) -> bool {
        let mut guard = self
            .self_profile
            .write()
            .unwrap_or_else(|e| e.into_inner());
        match guard.as_mut() {
            Some(profile) => {
                f(profile);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_starts_unset() {
        let state = SessionState::new();
        assert!(state.self_profile().is_none());
        assert!(!state.update_self_profile(|_| {}));
    }

    #[test]
    fn set_then_update() {
        let state = SessionState::new();
        state.set_self_profile(SelfProfile {
            id: "42".into(),
            username: "alice".into(),
            email: None,
        });
        assert!(state.update_self_profile(|p| p.email = Some("alice@example.com".into())));
        assert_eq!(
            state.self_profile().unwrap().email.as_deref(),
            Some("alice@example.com")
        );
    }
}
