/*!
 * Event Parameters
 * Typed parameter packs mapped onto the erased argument-list contract
 */

use crate::registry::{Handler, ParamSignature, SignatureToken};
use std::any::Any;

/// Parameter pack for a typed event
///
/// Implemented for tuples of zero to four argument types. A pack knows its
/// positional signature, its bucket token, and how to lend its values as
/// an erased argument slice.
pub trait EventParams: Sized + 'static {
    /// Positional signature of this pack
    fn signature() -> ParamSignature;

    /// Bucket token addressing this pack in a partitioned registry
    fn token() -> SignatureToken {
        SignatureToken::of::<Self>()
    }

    /// Lend the argument values as an erased positional slice
    fn with_refs<R>(&self, f: impl FnOnce(&[&dyn Any]) -> R) -> R;
}

/// Typed callable accepting one parameter pack by reference
///
/// Implemented for closures whose argument list matches the pack, e.g.
/// `Fn(&A, &B)` for `(A, B)`. Erasure produces the `Handler` stored in a
/// chain; the erased form downcasts each positional argument back to its
/// declared type.
pub trait HandlerOf<P: EventParams>: Sized + Send + Sync + 'static {
    /// Erase the typed callable into a chain-storable handler
    fn into_handler(self) -> Handler;
}

macro_rules! impl_event_params {
    ($(($($ty:ident $var:ident $idx:tt),*)),* $(,)?) => {$(
        impl<$($ty: Any),*> EventParams for ($($ty,)*) {
            fn signature() -> ParamSignature {
                ParamSignature::empty()$(.with::<$ty>())*
            }

            fn with_refs<R>(&self, f: impl FnOnce(&[&dyn Any]) -> R) -> R {
                f(&[$(&self.$idx as &dyn Any),*])
            }
        }

        impl<F, $($ty: Any),*> HandlerOf<($($ty,)*)> for F
        where
            F: Fn($(&$ty),*) + Send + Sync + 'static,
        {
            fn into_handler(self) -> Handler {
                Handler::new(move |_args| {
                    $(
                        let Some($var) = _args.get($idx).and_then(|arg| arg.downcast_ref::<$ty>())
                        else {
                            return;
                        };
                    )*
                    (self)($($var),*)
                })
            }
        }
    )*};
}

impl_event_params! {
    (),
    (A a 0),
    (A a 0, B b 1),
    (A a 0, B b 1, C c 2),
    (A a 0, B b 1, C c 2, D d 3),
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_pack_signature_arity() {
        assert_eq!(<()>::signature().arity(), 0);
        assert_eq!(<(i32,)>::signature().arity(), 1);
        assert_eq!(<(i32, String, f64, bool)>::signature().arity(), 4);
    }

    #[test]
    fn test_pack_signatures_compare_positionally() {
        assert!(<(i32, String)>::signature().matches(&<(i32, String)>::signature()));
        assert!(!<(i32, String)>::signature().matches(&<(String, i32)>::signature()));
        assert!(!<()>::signature().matches(&<(i32,)>::signature()));
    }

    #[test]
    fn test_erased_handler_round_trip() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let typed = move |a: &i32, b: &String| {
            *sink.lock() = Some((*a, b.clone()));
        };
        let handler = HandlerOf::<(i32, String)>::into_handler(typed);

        let args = (7i32, "hello".to_string());
        args.with_refs(|refs| handler.invoke(refs));

        assert_eq!(*seen.lock(), Some((7, "hello".to_string())));
    }
}
