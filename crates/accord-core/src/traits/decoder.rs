//! Event decoder trait.

use crate::error::DecodeError;
use crate::event::Event;
use crate::frame::GatewayFrame;

/// Turns a raw gateway frame into a typed domain event.
///
/// The session core treats decoding as an external collaborator: a decode
/// failure is logged and the frame skipped, never propagated into the
/// frame-processing path.
pub trait EventDecoder: Send + Sync {
    fn decode(&self, frame: &GatewayFrame) -> Result<Event, DecodeError>;
}
