//! Session readiness signalling.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// A one-shot latch marking the moment a session has dispatched its first
/// ready event.
///
/// Waiters park on a notification instead of polling; the latch can be
/// satisfied before anyone waits, in which case `wait` returns immediately.
/// Once signalled it stays signalled.
#[derive(Debug, Default)]
pub struct ReadySignal {
    signalled: AtomicBool,
    notify: Notify,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_signalled(&self) -> bool {
        self.signalled.load(Ordering::Acquire)
    }

    /// Mark the latch satisfied and wake all current waiters. Idempotent.
    pub fn signal(&self) {
        self.signalled.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Wait until the latch is satisfied. Returns immediately if it already
    /// is.
    pub async fn wait(&self) {
        loop {
            if self.is_signalled() {
                return;
            }
            // Register interest before re-checking, so a signal landing
            // between the check and the await is not lost.
            let notified = self.notify.notified();
            if self.is_signalled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_returns_immediately_when_pre_signalled() {
        let signal = ReadySignal::new();
        signal.signal();
        tokio::time::timeout(Duration::from_millis(50), signal.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wait_blocks_until_signalled() {
        let signal = Arc::new(ReadySignal::new());
        assert!(!signal.is_signalled());

        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        signal.signal();
        tokio::time::timeout(Duration::from_millis(100), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(signal.is_signalled());
    }

    #[tokio::test]
    async fn signal_is_idempotent() {
        let signal = ReadySignal::new();
        signal.signal();
        signal.signal();
        assert!(signal.is_signalled());
        tokio::time::timeout(Duration::from_millis(50), signal.wait())
            .await
            .unwrap();
    }
}
