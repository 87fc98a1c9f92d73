//! Error types for the accord client libraries.
//!
//! This module provides a unified error type with explicit variants for
//! authentication, transport, configuration, and decode failures. The split
//! matters to callers: a [`TransportError`] is safe to retry with backoff,
//! a rejected credential or challenge is not.

use thiserror::Error;

/// The unified error type for accord operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication errors (invalid input, rejected credentials or challenge).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Network transport errors (connection, timeout, malformed responses).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration errors (process-wide invariants, capability restrictions).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Gateway frame decode errors.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A wait for session readiness did not complete in time.
    #[error("timed out after {duration_ms}ms waiting for the session to become ready")]
    Timeout { duration_ms: u64 },

    /// A wait for session readiness was cancelled by the caller.
    #[error("wait for session readiness was cancelled")]
    Cancelled,
}

/// Authentication-related errors.
///
/// `RejectedCredentials` and `RejectedChallenge` mean the remote authority
/// refused the login; retrying with the same inputs will not succeed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Caller supplied unusable input. No network call was made.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The login endpoint refused the primary credentials.
    #[error("credentials rejected (HTTP {status}): {body}")]
    RejectedCredentials { status: u16, body: String },

    /// The second-factor endpoint refused the code or ticket.
    #[error("second-factor challenge rejected (HTTP {status}): {body}")]
    RejectedChallenge { status: u16, body: String },

    /// The account requires a second factor and no code was supplied.
    #[error("account is protected by a second factor; supply a code and retry")]
    SecondFactorRequired,
}

/// Transport-level errors. Safe to retry with backoff; this library never
/// retries on its own.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP failure.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The server returned 2xx but the body did not match the expected shape.
    /// Ambiguous responses are always treated as this, never as success.
    #[error("malformed response from server: {message}")]
    MalformedResponse { message: String },

    /// WebSocket-level failure on the gateway connection.
    #[error("websocket error: {message}")]
    WebSocket { message: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The process-wide proxy settings were already fixed, either by an
    /// earlier set or by the creation of any session.
    #[error(
        "proxy settings are shared by all sessions and cannot change once set or after any session has been created"
    )]
    ImmutableConfig,

    /// The operation is disabled for this account variant.
    #[error("unsupported operation for this account variant: {operation}")]
    UnsupportedOperation { operation: String },

    /// The builder has neither a token nor a usable credential pair.
    #[error("missing credentials: {message}")]
    MissingCredentials { message: String },

    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },
}

/// Errors turning a raw gateway frame into a typed event.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame envelope itself was unusable.
    #[error("unrecognized gateway frame: {message}")]
    Frame { message: String },

    /// The event payload did not match its declared type tag.
    #[error("failed to decode {event_type} payload: {message}")]
    Payload { event_type: String, message: String },
}
