//! Shutdown signal
//!
//! A one-shot, process-wide shutdown flag shared by the accept loop and
//! every connection handler. Triggering is idempotent and irreversible:
//! once set, the accept loop stops, every handler exits its read loop and
//! tears down, and the listening socket is released.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Shared shutdown flag with async wakeup.
#[derive(Default)]
pub struct ShutdownSignal {
    triggered: AtomicBool,
    notify: Notify,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers shutdown. The first call wakes every waiter; subsequent
    /// calls are no-ops.
    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    /// Returns whether shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Completes once shutdown has been triggered. Re-checks the flag
    /// after registering for notification so a trigger racing with the
    /// registration is never missed.
    pub async fn wait(&self) {
        loop {
            if self.is_triggered() {
                return;
            }
            let notified = self.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}
