/*!
 * Registry Traits
 * Per-concern interface consumed by dispatch facades
 */

use super::types::{Handler, ParamSignature, RegistryResult};
use std::any::Any;

/// Handler registration interface
pub trait HandlerRegistry<K> {
    /// Add a handler under a key, binding the key's signature on first add
    fn add(&self, key: K, handler: Handler, signature: ParamSignature) -> RegistryResult<()>;

    /// Remove the most recently added occurrence of a handler
    ///
    /// Silent no-op for an absent key; the signature is validated whenever
    /// the key is live, even if the handler itself was never added.
    fn remove(
        &self,
        key: &K,
        handler: &Handler,
        signature: &ParamSignature,
    ) -> RegistryResult<()>;

    /// Number of handlers currently chained under a key (0 if absent)
    fn count(&self, key: &K) -> usize;
}

/// Event trigger interface
pub trait EventTrigger<K> {
    /// Invoke every handler under a key, in insertion order, with `args`
    ///
    /// Returns the number of handlers invoked (0 for an absent key).
    /// Invocation runs against a snapshot taken at trigger time, so
    /// handlers may re-enter the registry; mutations they make become
    /// visible to subsequent triggers only. A panicking handler unwinds to
    /// the caller and the rest of the snapshot is skipped.
    fn trigger(
        &self,
        key: &K,
        signature: &ParamSignature,
        args: &[&dyn Any],
    ) -> RegistryResult<usize>;
}

/// Event lifecycle interface
pub trait EventLifecycle<K> {
    /// Drop the whole record for a key; no-op if absent
    fn clear_event(&self, key: &K);

    /// Drop every record
    fn clear_all(&self);
}
