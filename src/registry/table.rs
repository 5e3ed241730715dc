/*!
 * Signature Table
 * One-level registry enforcing a single signature per live event key
 */

use super::chain::HandlerChain;
use super::traits::{EventLifecycle, EventTrigger, HandlerRegistry};
use super::types::{Handler, ParamSignature, RegistryError, RegistryResult, RegistryStats};
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, warn};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Record for one live event key
#[derive(Clone)]
struct EventRecord {
    signature: ParamSignature,
    chain: HandlerChain,
}

/// One-level event registry
///
/// Every handler chained under a key shares the signature bound by the
/// key's first add. The binding lasts for the record's lifetime: once the
/// chain drains the record is dropped and a later add may bind a different
/// signature.
pub struct SignatureTable<K> {
    table: DashMap<K, EventRecord, RandomState>,
    stats: Arc<RwLock<RegistryStats>>,
}

impl<K> SignatureTable<K>
where
    K: Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            table: DashMap::with_hasher(RandomState::new()),
            stats: Arc::new(RwLock::new(RegistryStats::default())),
        }
    }

    /// Number of live event keys
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Signature currently bound to a key, if the key is live
    pub fn signature_of(&self, key: &K) -> Option<ParamSignature> {
        self.table.get(key).map(|record| record.signature.clone())
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }

    fn reject_mismatch(
        &self,
        key: &K,
        expected: &ParamSignature,
        actual: &ParamSignature,
    ) -> RegistryError {
        warn!(
            "Signature mismatch for event {:?}: expected {}, actual {}",
            key, expected, actual
        );
        self.stats.write().total_mismatches += 1;
        RegistryError::mismatch(key, expected, actual)
    }
}

impl<K> HandlerRegistry<K> for SignatureTable<K>
where
    K: Eq + Hash + fmt::Debug,
{
    fn add(&self, key: K, handler: Handler, signature: ParamSignature) -> RegistryResult<()> {
        match self.table.entry(key) {
            Entry::Occupied(mut entry) => {
                if !entry.get().signature.matches(&signature) {
                    return Err(self.reject_mismatch(
                        entry.key(),
                        &entry.get().signature,
                        &signature,
                    ));
                }
                entry.get_mut().chain.push(handler);
                debug!(
                    "Chained handler under event {:?} ({} total)",
                    entry.key(),
                    entry.get().chain.len()
                );
            }
            Entry::Vacant(entry) => {
                debug!(
                    "Bound event {:?} to signature {}",
                    entry.key(),
                    signature
                );
                entry.insert(EventRecord {
                    signature,
                    chain: HandlerChain::single(handler),
                });
            }
        }

        let mut stats = self.stats.write();
        stats.handlers_registered += 1;
        stats.total_added += 1;
        Ok(())
    }

    fn remove(
        &self,
        key: &K,
        handler: &Handler,
        signature: &ParamSignature,
    ) -> RegistryResult<()> {
        // Drop the shard guard before pruning the record so the prune does
        // not re-lock the shard it already holds.
        let (removed, drained) = {
            let Some(mut record) = self.table.get_mut(key) else {
                return Ok(());
            };
            if !record.signature.matches(signature) {
                return Err(self.reject_mismatch(key, &record.signature, signature));
            }
            let removed = record.chain.remove_last(handler);
            (removed, record.chain.is_empty())
        };

        if drained {
            self.table.remove_if(key, |_, record| record.chain.is_empty());
            debug!("Drained event {:?}", key);
        }

        if removed {
            let mut stats = self.stats.write();
            stats.handlers_registered = stats.handlers_registered.saturating_sub(1);
            stats.total_removed += 1;
        }
        Ok(())
    }

    fn count(&self, key: &K) -> usize {
        self.table
            .get(key)
            .map(|record| record.chain.len())
            .unwrap_or(0)
    }
}

impl<K> EventTrigger<K> for SignatureTable<K>
where
    K: Eq + Hash + fmt::Debug,
{
    fn trigger(
        &self,
        key: &K,
        signature: &ParamSignature,
        args: &[&dyn Any],
    ) -> RegistryResult<usize> {
        // Snapshot under the shard guard, invoke after dropping it so
        // handlers can re-enter this table without deadlocking.
        let chain = {
            let Some(record) = self.table.get(key) else {
                return Ok(0);
            };
            if !record.signature.matches(signature) {
                return Err(self.reject_mismatch(key, &record.signature, signature));
            }
            record.chain.clone()
        };

        let invoked = chain.invoke(args);
        debug!("Triggered event {:?}: {} handlers invoked", key, invoked);

        let mut stats = self.stats.write();
        stats.total_triggers += 1;
        stats.total_invocations += invoked as u64;
        Ok(invoked)
    }
}

impl<K> EventLifecycle<K> for SignatureTable<K>
where
    K: Eq + Hash + fmt::Debug,
{
    fn clear_event(&self, key: &K) {
        if let Some((_, record)) = self.table.remove(key) {
            let mut stats = self.stats.write();
            stats.handlers_registered = stats
                .handlers_registered
                .saturating_sub(record.chain.len());
            debug!(
                "Cleared event {:?} ({} handlers dropped)",
                key,
                record.chain.len()
            );
        }
    }

    fn clear_all(&self) {
        self.table.clear();
        self.stats.write().handlers_registered = 0;
        debug!("Cleared all events");
    }
}

impl<K> Default for SignatureTable<K>
where
    K: Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
