//! Simulation result cache.
//!
//! Bounded LRU with a per-entry time-to-live checked lazily on lookup.
//! Lineups are keyed by roster content, so two lineups holding the same nine
//! players share one entry regardless of id or slot layout.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::domain::Lineup;

use super::result::SimulationResult;

/// Content key for one simulation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationKey {
    digest: String,
    n_simulations: usize,
    correlated: bool,
}

impl SimulationKey {
    /// Key for simulating `lineup` with `n_simulations` draws.
    pub fn for_lineup(lineup: &Lineup, n_simulations: usize, correlated: bool) -> Self {
        let roster = lineup.roster_key().join("|");
        Self {
            digest: format!("{:x}", Sha256::digest(roster.as_bytes())),
            n_simulations,
            correlated,
        }
    }

    /// Hex digest of the sorted roster.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// RNG stream derived from the roster digest.
    pub fn stream(&self) -> u64 {
        u64::from_str_radix(&self.digest[..16], 16).unwrap_or_default()
    }
}

#[derive(Debug)]
struct CacheEntry {
    result: Arc<SimulationResult>,
    stored_at: Instant,
}

/// Thread-safe LRU + TTL store of simulation results.
#[derive(Debug)]
pub struct SimulationCache {
    entries: Mutex<LruCache<SimulationKey, CacheEntry>>,
    in_flight: Mutex<HashMap<SimulationKey, Arc<Mutex<()>>>>,
    ttl: Duration,
}

impl SimulationCache {
    /// Cache holding at most `capacity` results for `ttl` each.
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Live entry for `key`, evicting it first if expired.
    pub fn get(&self, key: &SimulationKey) -> Option<Arc<SimulationResult>> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Some(Arc::clone(&entry.result));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    /// Store a result, replacing any previous entry.
    pub fn insert(&self, key: SimulationKey, result: Arc<SimulationResult>) {
        self.entries.lock().put(
            key,
            CacheEntry {
                result,
                stored_at: Instant::now(),
            },
        );
    }

    /// Cached result, or compute and store one. Concurrent callers with the
    /// same key wait for the first computation instead of repeating it.
    ///
    /// Returns the result and whether it came from the cache.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: SimulationKey,
        compute: impl FnOnce() -> Result<SimulationResult, E>,
    ) -> Result<(Arc<SimulationResult>, bool), E> {
        if let Some(hit) = self.get(&key) {
            return Ok((hit, true));
        }

        let gate = Arc::clone(self.in_flight.lock().entry(key.clone()).or_default());
        let guard = gate.lock();

        let outcome = match self.get(&key) {
            Some(hit) => Ok((hit, true)),
            None => compute().map(|result| {
                let result = Arc::new(result);
                self.insert(key.clone(), Arc::clone(&result));
                (result, false)
            }),
        };

        drop(guard);
        let mut in_flight = self.in_flight.lock();
        if Arc::strong_count(&gate) <= 2 {
            in_flight.remove(&key);
        }
        outcome
    }

    /// Entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
