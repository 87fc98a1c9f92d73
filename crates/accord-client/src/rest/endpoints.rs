//! REST endpoint definitions and request/response types.
//!
//! The request/response JSON shapes are fixed external contracts this
//! library satisfies, not formats it owns.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Primary credential login.
pub const AUTH_LOGIN: &str = "auth/login";

/// Second-factor challenge completion.
pub const AUTH_MFA_TOTP: &str = "auth/mfa/totp";

/// Gateway URL discovery.
pub const GATEWAY: &str = "gateway";

/// The logged-in account's own profile.
pub const SELF_USER: &str = "users/@me";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from the login endpoint.
///
/// Either a token is issued directly (`mfa` absent or false), or the account
/// requires a second factor and a challenge ticket is returned instead.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub mfa: Option<bool>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub ticket: Option<String>,
}

/// Request body for challenge completion.
#[derive(Debug, Serialize)]
pub struct TotpRequest<'a> {
    pub code: &'a str,
    pub ticket: &'a str,
}

/// A response carrying only a token.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Response from gateway discovery.
#[derive(Debug, Deserialize)]
pub struct GatewayResponse {
    pub url: String,
}

/// Error response body shape.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body for account profile updates.
///
/// All current values are resent alongside the changes; the current password
/// authenticates the update.
#[derive(Debug, Serialize)]
pub struct AccountUpdateRequest<'a> {
    pub email: Option<&'a str>,
    pub password: &'a str,
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<&'a str>,
}
