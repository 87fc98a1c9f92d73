//! Session token type.

use std::fmt;

/// An opaque authentication token for an established login.
///
/// Tokens are issued by the login endpoints and carried on every
/// authenticated request and on the gateway handshake.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a token from its raw string value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token value.
    ///
    /// # Security
    ///
    /// Use only when constructing authorization headers or the gateway
    /// handshake. Never log or display this value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hides_value_in_debug() {
        let token = SessionToken::new("mfa.abc123xyz");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("abc123"));
        assert!(debug.contains("[REDACTED]"));
    }
}
