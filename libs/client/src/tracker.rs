//! In-flight request counter with an observable loading flag

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct RequestTracker {
    in_flight: Arc<AtomicUsize>,
    loading: Arc<watch::Sender<bool>>,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTracker {
    pub fn new() -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            loading: Arc::new(loading),
        }
    }

    /// Mark a request as started; it ends when the guard drops
    pub fn begin(&self) -> RequestGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.loading.send_replace(true);
        }
        RequestGuard {
            tracker: self.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Receiver that observes every loading flip
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }
}

#[derive(Debug)]
pub struct RequestGuard {
    tracker: RequestTracker,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        if self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.tracker.loading.send_replace(false);
        }
    }
}
