//! accord-client - Session bootstrap and event dispatch for the accord
//! chat gateway.
//!
//! The entry point is [`SessionBuilder`]: configure credentials, listeners,
//! and dispatch strategy, then build a connected [`Session`]. Decoded
//! gateway events flow to registered
//! [`EventListener`](accord_core::EventListener)s through an event manager.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use accord_client::SessionBuilder;
//! use accord_core::{ApiUrl, Event, EventListener};
//!
//! struct Printer;
//!
//! impl EventListener for Printer {
//!     fn on_event(&self, event: &Event) {
//!         if let Event::MessageCreate(msg) = event {
//!             println!("[{}] {}", msg.channel_id, msg.content);
//!         }
//!     }
//! }
//!
//! # async fn example() -> Result<(), accord_core::Error> {
//! let api = ApiUrl::new("https://chat.example.com/api")?;
//! let session = SessionBuilder::new(api)
//!     .identifier("me@example.com")
//!     .secret("hunter2")
//!     .add_listener(Arc::new(Printer))
//!     .build_and_wait(Duration::from_secs(30))
//!     .await?;
//! session.wait_until_ready().await;
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod auth;
pub mod builder;
pub mod config;
pub mod decode;
pub mod dispatch;
pub mod gateway;
pub mod intercept;
pub mod ready;
pub mod rest;
pub mod session;

pub use account::AccountManager;
pub use auth::Authenticator;
pub use builder::SessionBuilder;
pub use config::ProxySettings;
pub use decode::StandardEventDecoder;
pub use dispatch::{DirectEventManager, DispatchStrategy, SubscriptionEventManager};
pub use gateway::WsTransport;
pub use intercept::{InterceptorChain, SelfProfileInterceptor};
pub use rest::{ApiClient, CLIENT_USER_AGENT};
pub use session::Session;
