//! Per-key trailing-edge debounce on top of tokio timers.
//!
//! Each key owns at most one pending action. Scheduling again for the same
//! key before the quiet period elapses aborts the pending action and starts
//! a fresh timer, so only the latest action for a key runs. Keys never
//! interfere with each other.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

struct Pending {
    handle: JoinHandle<()>,
    /// Set once the timer has elapsed and the action started.
    fired: Arc<AtomicBool>,
}

impl Pending {
    /// Abort the action if it is still waiting out its timer. An action that
    /// already started is left to finish.
    fn cancel(self) -> bool {
        if self.fired.load(Ordering::Acquire) {
            return false;
        }
        self.handle.abort();
        true
    }
}

pub struct Debouncer<K> {
    delay: Duration,
    pending: Mutex<HashMap<K, Pending>>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` once `key` has been quiet for the configured delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, key: K, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::Release);
            action.await;
        });

        let mut pending = self.lock();
        pending.retain(|_, p| !p.handle.is_finished());
        if let Some(previous) = pending.insert(key.clone(), Pending { handle, fired }) {
            if previous.cancel() {
                debug!(?key, "debounce coalesced pending action");
            }
        }
    }

    /// Drop the pending action for `key`. Returns whether one was aborted
    /// before it started.
    pub fn cancel(&self, key: &K) -> bool {
        self.lock().remove(key).is_some_and(Pending::cancel)
    }

    /// Number of keys whose action has not finished yet.
    pub fn pending(&self) -> usize {
        self.lock().values().filter(|p| !p.handle.is_finished()).count()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
