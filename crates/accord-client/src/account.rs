//! Account profile management.

use tracing::{debug, instrument};

use accord_core::error::{AuthError, TransportError};
use accord_core::{Result, SessionToken};

use crate::rest::endpoints::{self, AccountUpdateRequest, TokenResponse};
use crate::session::Session;

/// Staged updates to the logged-in account's profile.
///
/// Changes accumulate on the manager and are applied in one request by
/// [`update`](AccountManager::update), which needs the account's current
/// password. A successful update rotates the session token in place; the
/// session keeps running on the new token.
pub struct AccountManager {
    session: Session,
    email: Option<String>,
    username: Option<String>,
    new_password: Option<String>,
}

impl AccountManager {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            email: None,
            username: None,
            new_password: None,
        }
    }

    /// Stage a new email address.
    pub fn set_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Stage a new username.
    pub fn set_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Stage a password change.
    pub fn set_password(mut self, password: impl Into<String>) -> Self {
        self.new_password = Some(password.into());
        self
    }

    /// Apply the staged changes, authenticated by the current password.
    ///
    /// Unstaged fields are resent with their currently known values. The
    /// rotated token from the response replaces the session token.
    #[instrument(skip_all)]
    pub async fn update(self, current_password: &str) -> Result<()> {
        let profile = self.session.state().self_profile();
        let current_email = profile.as_ref().and_then(|p| p.email.clone());
        let current_username = profile.as_ref().map(|p| p.username.clone());

        let email = self.email.clone().or(current_email);
        let username = self.username.clone().or(current_username);

        let request = AccountUpdateRequest {
            email: email.as_deref(),
            password: current_password,
            username: username.as_deref(),
            new_password: self.new_password.as_deref(),
        };

        let token = self.session.token();
        let (status, body) = self
            .session
            .api()
            .patch_raw(endpoints::SELF_USER, &request, &token)
            .await?;

        if !(200..300).contains(&status) {
            return Err(AuthError::RejectedCredentials { status, body }.into());
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::MalformedResponse {
                message: e.to_string(),
            })?;
        let token = parsed.token.ok_or_else(|| TransportError::MalformedResponse {
            message: "account update response missing token".to_string(),
        })?;

        debug!("account updated, rotating session token");
        self.session.replace_token(SessionToken::new(token));

        self.session.state().update_self_profile(|p| {
            if let Some(email) = email {
                p.email = Some(email);
            }
            if let Some(username) = username {
                p.username = username;
            }
        });

        Ok(())
    }
}
