//! Process-wide registry of metrics clients
//!
//! Every destination gets one long-lived client so repeated builds reuse the
//! same socket. Entries that have not been accessed for the idle timeout are
//! rebuilt on next access and swept opportunistically.
//!
//! Each key maps to a slot with its own lock. The map's shard lock is only
//! held long enough to fetch the slot, so a slow construction (DNS lookup)
//! for one destination never blocks lookups of another. Concurrent first
//! access to the same key still constructs exactly one client. Callers hold
//! their own `Arc` to the client; eviction only drops the registry's
//! reference.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use buildhound_common::{Clock, SystemClock};
use buildhound_domain::{CacheKeyPolicy, ClientKey, Destination, Result};
use dashmap::DashMap;
use tracing::debug;

use super::ports::{ClientFactory, ClientProvider, MetricsClient};

struct CachedClient {
    client: Arc<dyn MetricsClient>,
    last_access: Instant,
}

/// Per-key slot; `None` while the first construction is in flight or after
/// it failed.
type Slot = Arc<Mutex<Option<CachedClient>>>;

fn lock_slot(slot: &Mutex<Option<CachedClient>>) -> MutexGuard<'_, Option<CachedClient>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Destination-keyed cache of metrics clients with idle eviction
pub struct ClientRegistry<C: Clock = SystemClock> {
    factory: Arc<dyn ClientFactory>,
    entries: DashMap<ClientKey, Slot>,
    policy: CacheKeyPolicy,
    idle_timeout: Duration,
    clock: C,
}

impl ClientRegistry<SystemClock> {
    /// Create a registry driven by the system clock
    pub fn new(
        factory: Arc<dyn ClientFactory>,
        policy: CacheKeyPolicy,
        idle_timeout: Duration,
    ) -> Self {
        Self::with_clock(factory, policy, idle_timeout, SystemClock)
    }
}

impl<C: Clock> ClientRegistry<C> {
    /// Create a registry with an explicit clock
    pub fn with_clock(
        factory: Arc<dyn ClientFactory>,
        policy: CacheKeyPolicy,
        idle_timeout: Duration,
        clock: C,
    ) -> Self {
        Self { factory, entries: DashMap::new(), policy, idle_timeout, clock }
    }

    /// How destinations map onto cache keys
    pub fn policy(&self) -> CacheKeyPolicy {
        self.policy
    }

    /// Idle period after which a cached client is rebuilt
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Number of cached clients, stale ones included until swept
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no client is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry idle for at least the timeout; returns how many.
    ///
    /// Slots busy with a lookup or construction are skipped.
    pub fn evict_idle(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|key, slot| {
            let Ok(state) = slot.try_lock() else {
                return true;
            };
            match state.as_ref() {
                Some(cached) if self.is_idle(cached, now) => {
                    debug!(client = %key, "Evicting idle metrics client");
                    false
                }
                _ => true,
            }
        });
        before.saturating_sub(self.entries.len())
    }

    fn is_idle(&self, cached: &CachedClient, now: Instant) -> bool {
        now.saturating_duration_since(cached.last_access) >= self.idle_timeout
    }

    fn load_or_create(&self, destination: &Destination) -> Result<Arc<dyn MetricsClient>> {
        let key = destination.cache_key(self.policy);
        let slot: Slot = Arc::clone(self.entries.entry(key.clone()).or_default().value());

        let mut state = lock_slot(&slot);
        let now = self.clock.now();
        match state.as_mut() {
            Some(cached) if !self.is_idle(cached, now) => {
                cached.last_access = now;
                return Ok(Arc::clone(&cached.client));
            }
            Some(_) => debug!(client = %key, "Rebuilding idle metrics client"),
            None => debug!(client = %key, %destination, "Creating metrics client"),
        }

        match self.factory.create(destination) {
            Ok(client) => {
                *state = Some(CachedClient { client: Arc::clone(&client), last_access: now });
                drop(state);
                // A sweep may have dropped the slot while it was idle.
                self.entries.entry(key).or_insert_with(|| Arc::clone(&slot));
                Ok(client)
            }
            Err(err) => {
                *state = None;
                drop(state);
                self.entries.remove_if(&key, |_, current| {
                    Arc::ptr_eq(current, &slot)
                        && current.try_lock().is_ok_and(|state| state.is_none())
                });
                Err(err)
            }
        }
    }
}

impl<C: Clock> ClientProvider for ClientRegistry<C> {
    fn get_or_create(&self, destination: &Destination) -> Result<Arc<dyn MetricsClient>> {
        let client = self.load_or_create(destination)?;
        self.evict_idle();
        Ok(client)
    }
}
