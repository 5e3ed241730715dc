/*!
 * Partitioned Table
 * Two-level registry with one independent handler chain per signature token
 */

use super::chain::HandlerChain;
use super::types::{Handler, RegistryStats};
use ahash::RandomState;
use dashmap::DashMap;
use log::debug;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Signature-token buckets under one event key
type BucketMap<T> = HashMap<T, HandlerChain, RandomState>;

/// Two-level event registry
///
/// Each (key, token) pair addresses its own chain, so one event key can
/// carry several independent chains at once. Tokens are supplied by the
/// caller and never validated: a bucket only ever holds handlers added
/// under its own token, so no mismatch can arise and no operation fails.
///
/// Empty chains are pruned, as is an outer entry whose last bucket drains;
/// absent and empty behave identically on every path.
pub struct PartitionedTable<K, T> {
    table: DashMap<K, BucketMap<T>, RandomState>,
    stats: Arc<RwLock<RegistryStats>>,
}

impl<K, T> PartitionedTable<K, T>
where
    K: Eq + Hash + fmt::Debug,
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            table: DashMap::with_hasher(RandomState::new()),
            stats: Arc::new(RwLock::new(RegistryStats::default())),
        }
    }

    /// Append a handler to the (key, token) bucket, creating it if needed
    pub fn add(&self, key: K, token: T, handler: Handler) {
        self.table
            .entry(key)
            .or_insert_with(BucketMap::default)
            .entry(token)
            .or_default()
            .push(handler);

        let mut stats = self.stats.write();
        stats.handlers_registered += 1;
        stats.total_added += 1;
    }

    /// Remove the most recently added occurrence from the bucket
    ///
    /// Silent no-op if the key or bucket is absent.
    pub fn remove(&self, key: &K, token: &T, handler: &Handler) {
        let (removed, drained) = {
            let Some(mut buckets) = self.table.get_mut(key) else {
                return;
            };
            let Some(chain) = buckets.get_mut(token) else {
                return;
            };
            let removed = chain.remove_last(handler);
            if removed && chain.is_empty() {
                buckets.remove(token);
            }
            (removed, buckets.is_empty())
        };

        if drained {
            self.table.remove_if(key, |_, buckets| buckets.is_empty());
            debug!("Drained event {:?}", key);
        }

        if removed {
            let mut stats = self.stats.write();
            stats.handlers_registered = stats.handlers_registered.saturating_sub(1);
            stats.total_removed += 1;
        }
    }

    /// Invoke the bucket's chain in insertion order with `args`
    ///
    /// Returns the number of handlers invoked (0 if the key or bucket is
    /// absent). Invocation runs against a snapshot taken at trigger time,
    /// so handlers may re-enter the registry; their mutations are visible
    /// only to subsequent triggers. A panicking handler unwinds to the
    /// caller and the rest of the snapshot is skipped.
    pub fn trigger(&self, key: &K, token: &T, args: &[&dyn Any]) -> usize {
        let chain = {
            let Some(buckets) = self.table.get(key) else {
                return 0;
            };
            let Some(chain) = buckets.get(token) else {
                return 0;
            };
            chain.clone()
        };

        let invoked = chain.invoke(args);
        debug!("Triggered event {:?}: {} handlers invoked", key, invoked);

        let mut stats = self.stats.write();
        stats.total_triggers += 1;
        stats.total_invocations += invoked as u64;
        invoked
    }

    /// Number of handlers in the (key, token) bucket (0 if absent)
    pub fn count(&self, key: &K, token: &T) -> usize {
        self.table
            .get(key)
            .and_then(|buckets| buckets.get(token).map(HandlerChain::len))
            .unwrap_or(0)
    }

    /// Number of live buckets under a key (0 if absent)
    pub fn bucket_count(&self, key: &K) -> usize {
        self.table.get(key).map(|buckets| buckets.len()).unwrap_or(0)
    }

    /// Drop every bucket under a key; no-op if absent
    pub fn clear_event(&self, key: &K) {
        if let Some((_, buckets)) = self.table.remove(key) {
            let dropped: usize = buckets.values().map(HandlerChain::len).sum();
            let mut stats = self.stats.write();
            stats.handlers_registered = stats.handlers_registered.saturating_sub(dropped);
            debug!("Cleared event {:?} ({} handlers dropped)", key, dropped);
        }
    }

    /// Drop only the (key, token) bucket; no-op if absent
    pub fn clear_bucket(&self, key: &K, token: &T) {
        let (dropped, drained) = {
            let Some(mut buckets) = self.table.get_mut(key) else {
                return;
            };
            let dropped = buckets.remove(token).map(|chain| chain.len()).unwrap_or(0);
            (dropped, buckets.is_empty())
        };

        if drained {
            self.table.remove_if(key, |_, buckets| buckets.is_empty());
        }

        if dropped > 0 {
            let mut stats = self.stats.write();
            stats.handlers_registered = stats.handlers_registered.saturating_sub(dropped);
            debug!("Cleared bucket under event {:?} ({} handlers dropped)", key, dropped);
        }
    }

    /// Drop everything
    pub fn clear_all(&self) {
        self.table.clear();
        self.stats.write().handlers_registered = 0;
        debug!("Cleared all events");
    }

    /// Number of live event keys
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }
}

impl<K, T> Default for PartitionedTable<K, T>
where
    K: Eq + Hash + fmt::Debug,
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
