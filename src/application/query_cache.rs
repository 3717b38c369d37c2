//! Keyed single-flight cache with TTL-based freshness
//!
//! Central request cache for the console: one slot per cache key, where a
//! slot is either a cached value with its fetch time or an in-flight fetch
//! that concurrent callers for the same key wait on. At most one network
//! call per key is ever in flight; identical requests inside the freshness
//! window are served without network access.
//!
//! A generation counter makes invalidation safe against races: a fetch that
//! was already in flight when `invalidate_all` ran completes normally for
//! its waiters but is NOT written back into the cache.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::time::Instant;

enum Slot<T, E> {
    /// A fetch is running; waiters subscribe to the channel for its outcome
    InFlight(watch::Receiver<Option<Result<T, E>>>),
    Ready(CachedEntry<T>),
}

struct CachedEntry<T> {
    value: T,
    fetched_at: Instant,
}

struct Inner<T, E> {
    slots: HashMap<String, Slot<T, E>>,
    generation: u64,
}

/// Single-flight, TTL-bounded cache keyed by string
pub struct SingleFlightCache<T, E> {
    ttl: Duration,
    inner: RwLock<Inner<T, E>>,
}

impl<T, E> SingleFlightCache<T, E>
where
    T: Clone + Send + Sync,
    E: Clone + Send + Sync,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(Inner {
                slots: HashMap::new(),
                generation: 0,
            }),
        }
    }

    /// Return the fresh cached value for `key`, join an in-flight fetch for
    /// it, or run `fetch` as the single leader and share its outcome.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut fetch = Some(fetch);

        loop {
            enum Role<T, E> {
                Hit(T),
                Waiter(watch::Receiver<Option<Result<T, E>>>),
                Leader(watch::Sender<Option<Result<T, E>>>, u64),
            }

            let role = {
                let mut inner = self.inner.write().await;
                match inner.slots.get(key) {
                    Some(Slot::Ready(entry)) if entry.fetched_at.elapsed() <= self.ttl => {
                        Role::Hit(entry.value.clone())
                    }
                    Some(Slot::InFlight(receiver)) => Role::Waiter(receiver.clone()),
                    _ => {
                        let (sender, receiver) = watch::channel(None);
                        inner.slots.insert(key.to_owned(), Slot::InFlight(receiver));
                        Role::Leader(sender, inner.generation)
                    }
                }
            };

            match role {
                Role::Hit(value) => return Ok(value),
                Role::Waiter(mut receiver) => {
                    if receiver.changed().await.is_err() {
                        // leader vanished without resolving; take over
                        continue;
                    }
                    let outcome = receiver.borrow().clone();
                    if let Some(result) = outcome {
                        return result;
                    }
                }
                Role::Leader(sender, started_generation) => {
                    let Some(fetch) = fetch.take() else {
                        // leadership can only be taken once per call
                        continue;
                    };
                    let result = fetch().await;

                    let mut inner = self.inner.write().await;
                    match &result {
                        Ok(value) if inner.generation == started_generation => {
                            inner.slots.insert(
                                key.to_owned(),
                                Slot::Ready(CachedEntry {
                                    value: value.clone(),
                                    fetched_at: Instant::now(),
                                }),
                            );
                        }
                        // invalidated mid-flight: serve the waiters but do
                        // not write the stale result back
                        Ok(_) | Err(_) => {
                            if matches!(inner.slots.get(key), Some(Slot::InFlight(_))) {
                                inner.slots.remove(key);
                            }
                        }
                    }
                    drop(inner);

                    let _ = sender.send(Some(result.clone()));
                    return result;
                }
            }
        }
    }

    /// Drop every cached entry and fence off in-flight fetches from being
    /// written back. Does not itself trigger any refetch.
    pub async fn invalidate_all(&self) {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        inner.slots.retain(|_, slot| matches!(slot, Slot::InFlight(_)));
    }

    /// Whether a fresh entry exists for `key` (no fetch, no waiting)
    pub async fn is_fresh(&self, key: &str) -> bool {
        let inner = self.inner.read().await;
        matches!(
            inner.slots.get(key),
            Some(Slot::Ready(entry)) if entry.fetched_at.elapsed() <= self.ttl
        )
    }
}
