//! Remote shutdown scheduling for daemon mode
//!
//! `DELETE /api/you` acknowledges immediately; the process only exits after
//! a short grace delay so the response can flush to the client. The delay
//! feeds the graceful-shutdown future of `axum::serve`, so in-flight
//! connections drain before the process leaves `main`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

/// Grace delay between the acknowledgement and process termination.
const GRACE_DELAY: Duration = Duration::from_secs(1);

/// Handle used to schedule and await process termination.
///
/// Cloning shares the underlying signal. Once scheduled, termination
/// cannot be cancelled.
#[derive(Clone)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        ShutdownHandle {
            notify: Arc::new(Notify::new()),
        }
    }

    /// Schedule termination after the grace delay.
    pub fn schedule(&self) {
        let notify = Arc::clone(&self.notify);
        tokio::spawn(async move {
            tokio::time::sleep(GRACE_DELAY).await;
            notify.notify_one();
        });
    }

    /// Resolves once a scheduled shutdown's grace delay has elapsed.
    pub async fn triggered(&self) {
        self.notify.notified().await;
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}
