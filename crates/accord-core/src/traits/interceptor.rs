//! Frame interceptor trait.

use crate::frame::GatewayFrame;
use crate::state::SessionState;

/// A hook inspecting raw inbound frames before generic decode and dispatch.
///
/// Interceptors recognize frames by opcode and type tag; frames they do not
/// recognize must pass through untouched (`false`). On a recognized frame an
/// interceptor may enrich the session-scoped [`SessionState`] as a side
/// effect, then return whether default handling should be suppressed
/// (`true` means fully handled: no decode, no dispatch).
///
/// Interceptors never dispatch domain events themselves.
pub trait FrameInterceptor: Send + Sync {
    /// Inspect one raw frame. Returns `true` if the frame is fully handled.
    fn intercept(&self, frame: &GatewayFrame, state: &SessionState) -> bool;
}
