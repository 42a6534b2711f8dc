use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

struct TokenState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation handle tied to one path resolution.
///
/// Clones share the same state. The generation identifies which resolution
/// owns the published path.
#[derive(Clone)]
pub struct ResolutionToken {
    generation: u64,
    state: Arc<TokenState>,
}

impl ResolutionToken {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            generation,
            state: Arc::new(TokenState {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Completes once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // Registered before the check so a concurrent cancel is not missed
            let notified = self.state.notify.notified();

            if self.is_cancelled() {
                return;
            }

            notified.await;
        }
    }
}

impl std::fmt::Debug for ResolutionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionToken")
            .field("generation", &self.generation)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
