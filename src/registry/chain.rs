/*!
 * Handler Chain
 * Insertion-ordered multicast chain with last-occurrence removal
 */

use super::types::Handler;
use std::any::Any;
use std::fmt;

/// Ordered handler chain
///
/// Duplicates are allowed; the same handler may appear more than once.
/// Cloning the chain is the snapshot primitive used by trigger paths: a
/// clone only bumps each handler's refcount.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Handler>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain holding a single handler
    pub fn single(handler: Handler) -> Self {
        Self {
            handlers: vec![handler],
        }
    }

    /// Append a handler, preserving insertion order
    pub fn push(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    /// Remove the most recently added occurrence of `handler`
    ///
    /// Returns false if the handler is not in the chain.
    pub fn remove_last(&mut self, handler: &Handler) -> bool {
        match self.handlers.iter().rposition(|h| h == handler) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke every handler in insertion order, returning the count invoked
    ///
    /// A panicking handler unwinds to the caller; handlers after it are
    /// not invoked.
    pub fn invoke(&self, args: &[&dyn Any]) -> usize {
        for handler in &self.handlers {
            handler.invoke(args);
        }
        self.handlers.len()
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .finish()
    }
}
