/*!
 * Registry Types
 * Signatures, handlers, and result types for the event registries
 */

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Registry operation result
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("signature mismatch for event {key}: expected {expected}, actual {actual}")]
    SignatureMismatch {
        key: String,
        expected: ParamSignature,
        actual: ParamSignature,
    },
}

impl RegistryError {
    /// Build a mismatch error for a key, preserving both signatures
    pub(crate) fn mismatch(
        key: &impl fmt::Debug,
        expected: &ParamSignature,
        actual: &ParamSignature,
    ) -> Self {
        RegistryError::SignatureMismatch {
            key: format!("{:?}", key),
            expected: expected.clone(),
            actual: actual.clone(),
        }
    }
}

/// Positional descriptor for one handler parameter type
///
/// Equality and hashing use the `TypeId` only; the name is carried for
/// diagnostics.
#[derive(Clone, Copy, Eq)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for TypeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered parameter-type signature bound to a handler chain
///
/// Two signatures match iff they have the same arity and pairwise-equal
/// descriptors. The empty signature is a value of its own and never matches
/// a non-empty one.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ParamSignature(Vec<TypeDescriptor>);

impl ParamSignature {
    /// Zero-parameter signature
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Append one parameter type
    pub fn with<T: Any>(mut self) -> Self {
        self.0.push(TypeDescriptor::of::<T>());
        self
    }

    /// Signature equality rule shared by the registries
    pub fn matches(&self, other: &ParamSignature) -> bool {
        self == other
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        &self.0
    }
}

impl fmt::Display for ParamSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(param.name)?;
        }
        f.write_str(")")
    }
}

/// Opaque bucket address for the partitioned registry
///
/// Facades derive one per parameter pack; the table itself never inspects
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignatureToken(TypeId);

impl SignatureToken {
    pub fn of<P: Any>() -> Self {
        Self(TypeId::of::<P>())
    }
}

/// Type-erased handler callback
pub type HandlerFn = Arc<dyn Fn(&[&dyn Any]) + Send + Sync>;

/// Registered handler with allocation identity
///
/// Clones of one `Handler` compare equal; two separate registrations of
/// the same closure do not. Removal is by identity, never by behavior.
#[derive(Clone)]
pub struct Handler(HandlerFn);

impl Handler {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[&dyn Any]) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Invoke with an erased argument list
    pub fn invoke(&self, args: &[&dyn Any]) {
        (self.0)(args)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0))
    }
}

/// Registry statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryStats {
    pub handlers_registered: usize,
    pub total_added: u64,
    pub total_removed: u64,
    pub total_triggers: u64,
    pub total_invocations: u64,
    pub total_mismatches: u64,
}
