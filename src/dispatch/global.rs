/*!
 * Global Events
 * Process-wide partitioned dispatcher behind an initialize-once accessor
 */

use super::params::{EventParams, HandlerOf};
use crate::registry::{Handler, PartitionedTable, RegistryStats, SignatureToken};
use log::info;
use std::sync::OnceLock;

/// Global event identifier
pub type EventId = u32;

/// Process-wide event dispatcher
///
/// Backed by the partitioned table: one event id carries an independent
/// chain per parameter pack, so differently-typed subscribers to the same
/// id never interfere and no operation here can fail.
pub struct GlobalEvents {
    table: PartitionedTable<EventId, SignatureToken>,
}

impl GlobalEvents {
    fn new() -> Self {
        Self {
            table: PartitionedTable::new(),
        }
    }

    /// The process-wide instance, constructed on first access
    ///
    /// Safe under concurrent first access; the instance lives until
    /// process exit.
    pub fn instance() -> &'static GlobalEvents {
        static INSTANCE: OnceLock<GlobalEvents> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            info!("Global event registry initialized");
            GlobalEvents::new()
        })
    }

    /// Register a typed handler under an event id
    ///
    /// Returns the erased handler; keep it to unsubscribe later.
    pub fn subscribe<P, F>(&self, event: EventId, handler: F) -> Handler
    where
        P: EventParams,
        F: HandlerOf<P>,
    {
        let handler = handler.into_handler();
        self.table.add(event, P::token(), handler.clone());
        handler
    }

    /// Remove a previously returned handler from the pack's bucket
    pub fn unsubscribe<P: EventParams>(&self, event: EventId, handler: &Handler) {
        self.table.remove(&event, &P::token(), handler);
    }

    /// Trigger the bucket matching the argument pack
    ///
    /// Returns the number of handlers invoked (0 if nothing is
    /// registered for this id and pack).
    pub fn emit<P: EventParams>(&self, event: EventId, params: P) -> usize {
        params.with_refs(|args| self.table.trigger(&event, &P::token(), args))
    }

    /// Number of handlers registered for this id and pack
    pub fn count<P: EventParams>(&self, event: EventId) -> usize {
        self.table.count(&event, &P::token())
    }

    /// Drop only the bucket for this pack, leaving other packs intact
    pub fn clear_bucket<P: EventParams>(&self, event: EventId) {
        self.table.clear_bucket(&event, &P::token());
    }

    /// Drop every bucket under an event id
    pub fn clear_event(&self, event: EventId) {
        self.table.clear_event(&event);
    }

    /// Drop everything
    pub fn clear_all(&self) {
        self.table.clear_all();
    }

    pub fn stats(&self) -> RegistryStats {
        self.table.stats()
    }
}
