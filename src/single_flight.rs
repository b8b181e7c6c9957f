//! Lazily-initialized, single-flight asynchronous value.
//!
//! The first caller of [`SingleFlight::get_or_init`] starts the initializer;
//! every caller, before or after it settles, awaits that same future and
//! observes the same `Ok` or `Err`. The outcome is memoized, including
//! failures. [`SingleFlight::reset_failed`] is the explicit escape hatch for
//! retrying after a failure; it never discards a pending or successful value.
//!
//! The slot lock is only held while cloning the shared handle, never across
//! an `.await`.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

type SharedResult<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

pub struct SingleFlight<T, E> {
    slot: Mutex<Option<SharedResult<T, E>>>,
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Await the value, running `init` only if nothing has been started yet.
    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let shared = {
            let mut slot = self.lock();
            slot.get_or_insert_with(|| init().boxed().shared()).clone()
        };
        shared.await
    }

    /// The settled outcome, or `None` if nothing started or it is still pending.
    pub fn peek(&self) -> Option<Result<T, E>> {
        self.lock().as_ref().and_then(|shared| shared.peek().cloned())
    }

    /// Whether an initializer has been started (pending or settled).
    pub fn is_started(&self) -> bool {
        self.lock().is_some()
    }

    /// Forget a failed outcome so the next `get_or_init` starts over.
    ///
    /// Returns `true` if a failure was discarded.
    pub fn reset_failed(&self) -> bool {
        let mut slot = self.lock();
        let failed = matches!(
            slot.as_ref().and_then(|shared| shared.peek()),
            Some(Err(_))
        );
        if failed {
            *slot = None;
        }
        failed
    }

    fn lock(&self) -> MutexGuard<'_, Option<SharedResult<T, E>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Default for SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
