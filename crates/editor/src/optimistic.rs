//! Optimistic transitions: apply locally first, confirm remotely, roll
//! back on failure.
//!
//! Ordering within one call: the local apply happens before the remote
//! action is started, and the rollback (if any) after it settles.
//! Overlapping calls on the same value are not coordinated; the last
//! apply wins.

use std::future::Future;

use tokio::sync::watch;

/// Apply `next` through `apply`, run `action`, and restore `current` if
/// the action fails.
///
/// The error is returned unchanged after the rollback, so callers only see
/// it once local state is already back to `current`.
pub async fn optimistic_update<T, A, F, Fut, R, E>(
    current: T,
    mut apply: A,
    next: T,
    action: F,
) -> Result<R, E>
where
    A: FnMut(T),
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let previous = current;
    apply(next);
    match action().await {
        Ok(value) => Ok(value),
        Err(err) => {
            apply(previous);
            Err(err)
        }
    }
}

/// An observable value that supports optimistic transitions.
///
/// Backed by a [`watch`] channel: subscribers see the speculative value
/// as soon as it is applied, and see the rollback if one happens.
#[derive(Debug)]
pub struct OptimisticValue<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> OptimisticValue<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current visible value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Overwrite the visible value, e.g. when the backend reports the
    /// authoritative one.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Speculatively replace the value with `next` while `action` runs.
    pub async fn transition<F, Fut, R, E>(&self, next: T, action: F) -> Result<R, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        tracing::debug!("Applying speculative value");
        let result = optimistic_update(self.get(), |value| self.set(value), next, action).await;
        if result.is_err() {
            tracing::warn!("Optimistic transition rolled back");
        }
        result
    }

    /// Speculatively mutate the whole value while `action` runs.
    ///
    /// The entire value is snapshotted first and restored as a unit on
    /// failure. `action` receives a copy of the mutated value.
    pub async fn mutate<M, F, Fut, R, E>(&self, mutation: M, action: F) -> Result<R, E>
    where
        M: FnOnce(&mut T),
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let snapshot = self.get();
        self.tx.send_modify(mutation);
        tracing::debug!("Applied speculative mutation");
        match action(self.get()).await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.set(snapshot);
                tracing::warn!("Optimistic mutation rolled back");
                Err(err)
            }
        }
    }
}
