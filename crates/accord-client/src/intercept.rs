//! Frame interception.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{error, trace};

use accord_core::{FrameInterceptor, GatewayFrame, OP_DISPATCH, SelfProfile, SessionState};

/// An ordered chain of frame interceptors.
///
/// Every inbound frame runs through the chain before generic decode and
/// dispatch. Interceptors run in registration order; the first one claiming
/// a frame as fully handled short-circuits the rest (fixed first-match-wins
/// policy). A panicking interceptor is logged and treated as not having
/// handled the frame.
#[derive(Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn FrameInterceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor. Runs after everything already in the chain.
    pub fn push(&mut self, interceptor: Arc<dyn FrameInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run the chain over one frame. Returns whether the frame was fully
    /// handled and default processing should be suppressed.
    pub fn intercept(&self, frame: &GatewayFrame, state: &SessionState) -> bool {
        for interceptor in &self.interceptors {
            match catch_unwind(AssertUnwindSafe(|| interceptor.intercept(frame, state))) {
                Ok(true) => {
                    trace!(op = frame.op, t = ?frame.event_type, "frame claimed by interceptor");
                    return true;
                }
                Ok(false) => {}
                Err(_) => {
                    error!(
                        op = frame.op,
                        t = ?frame.event_type,
                        "interceptor panicked; treating frame as not handled"
                    );
                }
            }
        }
        false
    }
}

/// Enriches the session's self profile from `READY` and `USER_UPDATE`
/// frames.
///
/// User-account sessions carry profile attributes (notably the email) that
/// are not part of the base gateway payload contract; this interceptor
/// captures them into session state. It never suppresses default handling:
/// the frames still decode and dispatch normally.
pub struct SelfProfileInterceptor;

impl FrameInterceptor for SelfProfileInterceptor {
    fn intercept(&self, frame: &GatewayFrame, state: &SessionState) -> bool {
        if frame.op != OP_DISPATCH {
            return false;
        }
        let payload = match frame.event_type.as_deref() {
            Some("READY") => frame.data.get("user"),
            Some("USER_UPDATE") => Some(&frame.data),
            _ => return false,
        };

        if let Some(payload) = payload {
            if let Ok(profile) = serde_json::from_value::<SelfProfile>(payload.clone()) {
                trace!(id = %profile.id, "updating self profile from frame");
                state.set_self_profile(profile);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Claimer {
        claim_type: &'static str,
    }

    impl FrameInterceptor for Claimer {
        fn intercept(&self, frame: &GatewayFrame, _state: &SessionState) -> bool {
            frame.event_type.as_deref() == Some(self.claim_type)
        }
    }

    struct Panicking;

    impl FrameInterceptor for Panicking {
        fn intercept(&self, _frame: &GatewayFrame, _state: &SessionState) -> bool {
            panic!("interceptor fault");
        }
    }

    #[test]
    fn non_matching_frames_pass_through() {
        let mut chain = InterceptorChain::new();
        chain.push(Arc::new(Claimer {
            claim_type: "SELF_UPDATE",
        }));
        let state = SessionState::new();

        let other = GatewayFrame::dispatch("MESSAGE_CREATE", json!({}));
        assert!(!chain.intercept(&other, &state));

        let claimed = GatewayFrame::dispatch("SELF_UPDATE", json!({}));
        assert!(chain.intercept(&claimed, &state));
    }

    #[test]
    fn first_match_wins_and_short_circuits() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counting {
            calls: Arc<AtomicUsize>,
        }
        impl FrameInterceptor for Counting {
            fn intercept(&self, _frame: &GatewayFrame, _state: &SessionState) -> bool {
                self.calls.fetch_add(1, Ordering::SeqCst);
                false
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let mut chain = InterceptorChain::new();
        chain.push(Arc::new(Claimer { claim_type: "X" }));
        chain.push(Arc::new(Counting {
            calls: calls.clone(),
        }));
        let state = SessionState::new();

        assert!(chain.intercept(&GatewayFrame::dispatch("X", json!({})), &state));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_interceptor_counts_as_not_handled() {
        let mut chain = InterceptorChain::new();
        chain.push(Arc::new(Panicking));
        chain.push(Arc::new(Claimer { claim_type: "X" }));
        let state = SessionState::new();

        // The fault is isolated and the rest of the chain still runs.
        assert!(chain.intercept(&GatewayFrame::dispatch("X", json!({})), &state));
        assert!(!chain.intercept(&GatewayFrame::dispatch("Y", json!({})), &state));
    }

    #[test]
    fn self_profile_captured_from_ready() {
        let mut chain = InterceptorChain::new();
        chain.push(Arc::new(SelfProfileInterceptor));
        let state = SessionState::new();

        let ready = GatewayFrame::dispatch(
            "READY",
            json!({"user": {"id": "42", "username": "alice", "email": "alice@example.com"}}),
        );
        // Enrichment never suppresses default handling.
        assert!(!chain.intercept(&ready, &state));

        let profile = state.self_profile().unwrap();
        assert_eq!(profile.id, "42");
        assert_eq!(profile.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn self_profile_updated_from_user_update() {
        let mut chain = InterceptorChain::new();
        chain.push(Arc::new(SelfProfileInterceptor));
        let state = SessionState::new();

        let update = GatewayFrame::dispatch(
            "USER_UPDATE",
            json!({"id": "42", "username": "renamed", "email": "new@example.com"}),
        );
        assert!(!chain.intercept(&update, &state));
        assert_eq!(state.self_profile().unwrap().username, "renamed");
    }

    #[test]
    fn non_dispatch_frames_are_ignored() {
        let mut chain = InterceptorChain::new();
        chain.push(Arc::new(SelfProfileInterceptor));
        let state = SessionState::new();

        let frame = GatewayFrame {
            op: 11,
            event_type: None,
            data: json!({"id": "42"}),
        };
        assert!(!chain.intercept(&frame, &state));
        assert!(state.self_profile().is_none());
    }
}
