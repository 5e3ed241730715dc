/*!
 * Registry Module
 * Event registries mapping opaque keys to ordered handler chains
 */

mod chain;
mod partitioned;
mod table;
pub mod traits;
pub mod types;

// Re-export public API
pub use chain::HandlerChain;
pub use partitioned::PartitionedTable;
pub use table::SignatureTable;
pub use traits::{EventLifecycle, EventTrigger, HandlerRegistry};
pub use types::{
    Handler, HandlerFn, ParamSignature, RegistryError, RegistryResult, RegistryStats,
    SignatureToken, TypeDescriptor,
};
