//! accord-core - Core types and traits for the accord chat gateway client.
//!
//! This crate holds the vocabulary shared by the client implementation and
//! its collaborators: credentials and tokens, the raw gateway frame
//! envelope, decoded domain events, the error taxonomy, and the trait seams
//! (listener, event manager, frame interceptor, transport, decoder).

pub mod credentials;
pub mod error;
pub mod event;
pub mod frame;
pub mod state;
pub mod token;
pub mod traits;
pub mod types;

// Re-export primary types at crate root for convenience
pub use credentials::{Credentials, SecondFactor};
pub use error::Error;
pub use event::{Event, EventKind, SelfProfile, Subscription, Subscriptions};
pub use frame::{GatewayFrame, OP_DISPATCH};
pub use state::SessionState;
pub use token::SessionToken;
pub use traits::{EventDecoder, EventListener, EventManager, FrameInterceptor, GatewayTransport};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
