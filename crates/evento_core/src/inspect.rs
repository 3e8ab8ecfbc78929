//! Structural member probing for dispatch payloads
//!
//! Payloads are opaque to the dispatcher. To decide whether a payload already
//! is an interaction event, it is probed member by member through [`Inspect`],
//! the same way a script engine would read properties off an object.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// A probed member, classified by primitive kind
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Member<'a> {
    Bool(bool),
    Number(f64),
    Str(&'a str),
    /// A callable member
    Method,
    /// Any non-null compound value (object, array, handle)
    Object,
    Null,
    /// Present but holding no value
    Undefined,
}

impl Member<'_> {
    /// Script-style truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Member::Bool(b) => *b,
            Member::Number(n) => *n != 0.0 && !n.is_nan(),
            Member::Str(s) => !s.is_empty(),
            Member::Method | Member::Object => true,
            Member::Null | Member::Undefined => false,
        }
    }
}

/// Types that can be carried as a dispatch payload
///
/// `member` must not panic; a member that cannot be read is reported as
/// absent (`None`).
pub trait Inspect: Any + Send + Sync + Debug {
    /// Probe a member by its script-facing name
    fn member(&self, name: &str) -> Option<Member<'_>>;

    /// Access the concrete value for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Shared, type-erased payload
pub type Payload = Arc<dyn Inspect>;

/// Box a value into a [`Payload`]
pub fn payload<T: Inspect>(value: T) -> Payload {
    Arc::new(value)
}

/// Borrow the concrete value behind a payload
pub fn downcast_payload<T: 'static>(payload: &Payload) -> Option<&T> {
    payload.as_any().downcast_ref::<T>()
}

/// Plain values expose no members
macro_rules! impl_inspect_plain {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn member(&self, _name: &str) -> Option<Member<'_>> {
                    None
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }
            }
        )*
    };
}

impl_inspect_plain!(bool, i32, i64, u32, u64, f32, f64, String, &'static str, ());

impl Inspect for serde_json::Value {
    fn member(&self, name: &str) -> Option<Member<'_>> {
        use serde_json::Value;

        let Value::Object(map) = self else {
            return None;
        };
        Some(match map.get(name)? {
            Value::Null => Member::Null,
            Value::Bool(b) => Member::Bool(*b),
            Value::Number(n) => Member::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Member::Str(s),
            Value::Array(_) | Value::Object(_) => Member::Object,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
