//! The two-step login protocol.

use tracing::{debug, info, instrument};

use accord_core::error::{AuthError, TransportError};
use accord_core::{Credentials, Result, SecondFactor, SessionToken};

use crate::rest::ApiClient;
use crate::rest::endpoints::{AUTH_LOGIN, AUTH_MFA_TOTP, LoginRequest, LoginResponse, TokenResponse, TotpRequest};

/// A pending second-factor challenge issued by the login endpoint.
///
/// Consumed exactly once to obtain the final token. Expiry is server-side;
/// a stale ticket surfaces as a rejected challenge and is never retried
/// locally.
#[derive(Debug)]
pub struct PendingChallenge {
    ticket: String,
}

/// Performs the remote login protocol and yields a session token.
///
/// Authentication is terminal for one attempt: no retries happen here. The
/// error taxonomy distinguishes "wrong credentials" ([`AuthError`]) from
/// "network broken" ([`TransportError`]) so callers can make retry
/// decisions.
#[derive(Debug, Clone)]
pub struct Authenticator {
    client: ApiClient,
}

impl Authenticator {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Authenticate with the given credentials.
    ///
    /// Pre-issued tokens are returned unchanged without any network call.
    /// Primary credentials go through the login endpoint and, if the account
    /// requires it and a code was supplied, the second-factor endpoint.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidInput`] for an empty identifier or secret,
    ///   before any network call
    /// - [`AuthError::RejectedCredentials`] / [`AuthError::RejectedChallenge`]
    ///   when the remote authority refuses
    /// - [`AuthError::SecondFactorRequired`] when the account needs a code
    ///   and none was supplied (no second network call is made)
    /// - [`TransportError`] for network failures and malformed responses
    #[instrument(skip(self, credentials), fields(api = %self.client.api()))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken> {
        match credentials {
            Credentials::Token(token) => {
                debug!("using pre-issued token, skipping login protocol");
                Ok(token.clone())
            }
            Credentials::Password {
                identifier,
                secret,
                second_factor,
            } => {
                if identifier.trim().is_empty() || secret.trim().is_empty() {
                    return Err(AuthError::InvalidInput {
                        message: "identifier and secret must be non-empty".to_string(),
                    }
                    .into());
                }

                info!("submitting primary credentials");
                match self.submit_primary(identifier, secret).await? {
                    PrimaryOutcome::Token(token) => {
                        debug!("token issued without a second factor");
                        Ok(token)
                    }
                    PrimaryOutcome::Challenge(challenge) => {
                        let Some(code) = second_factor else {
                            return Err(AuthError::SecondFactorRequired.into());
                        };
                        self.complete_challenge(challenge, code).await
                    }
                }
            }
        }
    }

    /// Step 1: submit the primary credentials.
    async fn submit_primary(&self, identifier: &str, secret: &str) -> Result<PrimaryOutcome> {
        let request = LoginRequest {
            email: identifier,
            password: secret,
        };
        let (status, body) = self.client.post_raw(AUTH_LOGIN, &request).await?;

        if !(200..300).contains(&status) {
            return Err(AuthError::RejectedCredentials { status, body }.into());
        }

        let response: LoginResponse = parse_body(&body)?;

        // A response with neither a token nor a well-formed challenge is a
        // parse failure, never a guessed default.
        if !response.mfa.unwrap_or(false) {
            let token = response.token.ok_or_else(|| {
                malformed("login response carried neither a token nor a second-factor challenge")
            })?;
            return Ok(PrimaryOutcome::Token(SessionToken::new(token)));
        }

        let ticket = response
            .ticket
            .ok_or_else(|| malformed("second-factor challenge is missing its ticket"))?;

        debug!("account requires a second factor");
        Ok(PrimaryOutcome::Challenge(PendingChallenge { ticket }))
    }

    /// Step 2: complete a pending challenge with the supplied code.
    async fn complete_challenge(
        &self,
        challenge: PendingChallenge,
        code: &SecondFactor,
    ) -> Result<SessionToken> {
        info!("submitting second-factor code");
        let request = TotpRequest {
            code: code.expose(),
            ticket: &challenge.ticket,
        };
        let (status, body) = self.client.post_raw(AUTH_MFA_TOTP, &request).await?;

        if !(200..300).contains(&status) {
            return Err(AuthError::RejectedChallenge { status, body }.into());
        }

        let response: TokenResponse = parse_body(&body)?;
        let token = response
            .token
            .ok_or_else(|| malformed("challenge response is missing a token"))?;

        debug!("token issued after second factor");
        Ok(SessionToken::new(token))
    }
}

enum PrimaryOutcome {
    Token(SessionToken),
    Challenge(PendingChallenge),
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| malformed(&e.to_string()))
}

fn malformed(message: &str) -> accord_core::Error {
    TransportError::MalformedResponse {
        message: message.to_string(),
    }
    .into()
}
