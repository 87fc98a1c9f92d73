//! Trait seams between the session core and its collaborators.

mod decoder;
mod interceptor;
mod listener;
mod manager;
mod transport;

pub use decoder::EventDecoder;
pub use interceptor::FrameInterceptor;
pub use listener::EventListener;
pub use manager::EventManager;
pub use transport::{ConnectOptions, ConnectionHandle, FrameSource, GatewayConnection, GatewayTransport};
