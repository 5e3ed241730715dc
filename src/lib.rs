/*!
 * Event Registry Library
 * Decoupled event dispatch over signature-checked handler chains
 */

pub mod dispatch;
pub mod registry;

// Re-exports
pub use dispatch::{EventDispatcher, EventId, EventParams, GlobalEvents, HandlerOf};
pub use registry::{
    EventLifecycle, EventTrigger, Handler, HandlerChain, HandlerFn, HandlerRegistry,
    ParamSignature, PartitionedTable, RegistryError, RegistryResult, RegistryStats,
    SignatureTable, SignatureToken, TypeDescriptor,
};
