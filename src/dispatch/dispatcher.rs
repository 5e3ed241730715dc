/*!
 * Event Dispatcher
 * Typed facade over the one-level signature table
 */

use super::params::{EventParams, HandlerOf};
use crate::registry::{
    EventLifecycle, EventTrigger, Handler, HandlerRegistry, ParamSignature, RegistryResult,
    RegistryStats, SignatureTable,
};
use std::fmt;
use std::hash::Hash;

/// Typed event dispatcher
///
/// Presents arity-typed subscribe/emit shapes over the variadic table
/// contract. The signature passed down is derived from the parameter pack,
/// so a key stays bound to the pack of its first subscriber until its
/// chain drains.
pub struct EventDispatcher<K> {
    table: SignatureTable<K>,
}

impl<K> EventDispatcher<K>
where
    K: Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            table: SignatureTable::new(),
        }
    }

    /// Register a typed handler under a key
    ///
    /// Returns the erased handler; keep it to unsubscribe later. Each call
    /// erases afresh, so two subscriptions of the same closure are distinct
    /// registrations.
    pub fn subscribe<P, F>(&self, key: K, handler: F) -> RegistryResult<Handler>
    where
        P: EventParams,
        F: HandlerOf<P>,
    {
        let handler = handler.into_handler();
        self.table.add(key, handler.clone(), P::signature())?;
        Ok(handler)
    }

    /// Remove a previously returned handler
    pub fn unsubscribe<P: EventParams>(&self, key: &K, handler: &Handler) -> RegistryResult<()> {
        self.table.remove(key, handler, &P::signature())
    }

    /// Trigger a key with a typed argument pack
    ///
    /// Returns the number of handlers invoked (0 for an absent key).
    pub fn emit<P: EventParams>(&self, key: &K, params: P) -> RegistryResult<usize> {
        params.with_refs(|args| self.table.trigger(key, &P::signature(), args))
    }

    pub fn count(&self, key: &K) -> usize {
        self.table.count(key)
    }

    pub fn signature_of(&self, key: &K) -> Option<ParamSignature> {
        self.table.signature_of(key)
    }

    pub fn clear_event(&self, key: &K) {
        self.table.clear_event(key);
    }

    pub fn clear_all(&self) {
        self.table.clear_all();
    }

    /// Number of live event keys
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        self.table.stats()
    }
}

impl<K> Default for EventDispatcher<K>
where
    K: Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
