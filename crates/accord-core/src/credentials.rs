//! Login credential types.

use std::fmt;

use crate::token::SessionToken;

/// A time-limited one-time second-factor code.
///
/// # Security
///
/// The code is never exposed in Debug output to prevent accidental logging.
#[derive(Clone)]
pub struct SecondFactor(String);

impl SecondFactor {
    /// Create a second-factor code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code value.
    ///
    /// # Security
    ///
    /// Use only when constructing the challenge-completion request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecondFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecondFactor").field(&"[REDACTED]").finish()
    }
}

/// Login credentials for one build attempt.
///
/// Exactly one variant is active per attempt, and the value is immutable
/// once submitted to the authenticator.
///
/// # Security
///
/// The secret is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use accord_core::Credentials;
///
/// let creds = Credentials::password("alice@example.com", "hunter2");
/// assert!(format!("{:?}", creds).contains("[REDACTED]"));
/// ```
#[derive(Clone)]
pub enum Credentials {
    /// Primary identifier/secret pair, with an optional second-factor code
    /// used only if the account turns out to require one.
    Password {
        identifier: String,
        secret: String,
        second_factor: Option<SecondFactor>,
    },

    /// A pre-issued token. Bypasses the login protocol entirely.
    Token(SessionToken),
}

impl Credentials {
    /// Create primary credentials from an identifier and secret.
    pub fn password(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::Password {
            identifier: identifier.into(),
            secret: secret.into(),
            second_factor: None,
        }
    }

    /// Attach a second-factor code to primary credentials.
    ///
    /// Has no effect on token credentials; a pre-issued token never needs a
    /// second factor.
    pub fn with_second_factor(self, code: SecondFactor) -> Self {
        match self {
            Self::Password {
                identifier, secret, ..
            } => Self::Password {
                identifier,
                secret,
                second_factor: Some(code),
            },
            other => other,
        }
    }

    /// Create credentials from a pre-issued token.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(SessionToken::new(token))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password {
                identifier,
                second_factor,
                ..
            } => f
                .debug_struct("Credentials::Password")
                .field("identifier", identifier)
                .field("secret", &"[REDACTED]")
                .field("second_factor", second_factor)
                .finish(),
            Self::Token(token) => f.debug_tuple("Credentials::Token").field(token).finish(),
        }
    }
}
