//! Gateway transport trait.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::Result;
use crate::frame::GatewayFrame;
use crate::token::SessionToken;

/// Connection options copied out of the session configuration for the
/// transport to consume. Reconnect timing and heartbeats are entirely the
/// transport's concern; the session core only carries the toggle.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub reconnect: bool,
}

/// A live stream of raw inbound gateway frames.
pub trait FrameSource: Stream<Item = Result<GatewayFrame>> + Send {}

impl<T> FrameSource for T where T: Stream<Item = Result<GatewayFrame>> + Send {}

/// Handle for requesting that an established connection shut down.
pub trait ConnectionHandle: Send + Sync {
    /// Request the connection to close. Must be safe to call more than once.
    fn close(&self);
}

/// An established gateway connection: the inbound frame stream plus the
/// handle that closes it.
pub struct GatewayConnection {
    frames: Pin<Box<dyn FrameSource>>,
    handle: Box<dyn ConnectionHandle>,
}

impl GatewayConnection {
    pub fn new(
        frames: impl FrameSource + 'static,
        handle: impl ConnectionHandle + 'static,
    ) -> Self {
        Self {
            frames: Box::pin(frames),
            handle: Box::new(handle),
        }
    }

    /// Split the connection into its frame stream and close handle.
    pub fn into_parts(self) -> (Pin<Box<dyn FrameSource>>, Box<dyn ConnectionHandle>) {
        (self.frames, self.handle)
    }
}

/// The transport layer that opens authenticated gateway connections.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Connect to the gateway with the given session token.
    async fn connect(
        &self,
        token: &SessionToken,
        options: &ConnectOptions,
    ) -> Result<GatewayConnection>;
}
