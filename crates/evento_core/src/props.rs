//! Component property mappings
//!
//! A [`Props`] value is the set of named properties a component currently
//! holds. Callback props are stored as a tagged [`Callback`] and are checked
//! when they are registered, so the dispatcher only ever does a keyed lookup.
//!
//! # Example
//!
//! ```
//! use evento_core::Props;
//!
//! let props = Props::builder()
//!     .on("jump", |evt| println!("jumped: {:?}", evt.detail_as::<&str>()))
//!     .data("speed", &3.5)
//!     .build()
//!     .unwrap();
//!
//! assert!(props.callback("onJump").is_some());
//! assert_eq!(props.event_names(), vec!["jump".to_string()]);
//! ```

use crate::envelope::CustomEvent;
use crate::error::{EventoError, HandlerError, Result};
use crate::inspect::{Member, Payload};
use crate::naming::{
    event_name_to_prop_name, is_callback_prop_name, prop_name_to_event_name, validate_event_name,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Argument a callback receives
#[derive(Clone, Debug)]
pub enum DispatchEvent {
    /// A native interaction event passed through unmodified
    Forwarded(Payload),
    /// A payload wrapped by the dispatcher
    Custom(Arc<CustomEvent>),
}

impl DispatchEvent {
    /// Type of the underlying event, if it exposes one
    pub fn event_type(&self) -> Option<&str> {
        match self {
            DispatchEvent::Forwarded(payload) => match payload.member("type") {
                Some(Member::Str(s)) => Some(s),
                _ => None,
            },
            DispatchEvent::Custom(evt) => Some(evt.event_type()),
        }
    }

    /// Wrapped payload of a custom event
    pub fn detail(&self) -> Option<&Payload> {
        self.as_custom()?.detail()
    }

    /// Wrapped payload of a custom event, as its concrete type
    pub fn detail_as<T: 'static>(&self) -> Option<&T> {
        self.as_custom()?.detail_as::<T>()
    }

    pub fn as_custom(&self) -> Option<&CustomEvent> {
        match self {
            DispatchEvent::Custom(evt) => Some(evt),
            DispatchEvent::Forwarded(_) => None,
        }
    }

    /// The forwarded native event
    pub fn forwarded(&self) -> Option<&Payload> {
        match self {
            DispatchEvent::Forwarded(payload) => Some(payload),
            DispatchEvent::Custom(_) => None,
        }
    }

    /// Borrow the forwarded event as its concrete type
    pub fn downcast<T: 'static>(&self) -> Option<&T> {
        self.forwarded()?.as_any().downcast_ref::<T>()
    }
}

/// Values a synchronous handler may return
///
/// Only failure is observed; any other returned value is discarded.
pub trait IntoOutcome {
    fn into_outcome(self) -> std::result::Result<(), HandlerError>;
}

macro_rules! impl_into_outcome_ok {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOutcome for $ty {
                fn into_outcome(self) -> std::result::Result<(), HandlerError> {
                    Ok(())
                }
            }
        )*
    };
}

impl_into_outcome_ok!((), bool, String, &'static str, serde_json::Value, DispatchEvent);

impl<T, E> IntoOutcome for std::result::Result<T, E>
where
    T: IntoOutcome,
    E: Into<HandlerError>,
{
    fn into_outcome(self) -> std::result::Result<(), HandlerError> {
        match self {
            Ok(value) => value.into_outcome(),
            Err(e) => Err(e.into()),
        }
    }
}

/// Synchronous callback
pub type SyncHandler =
    Arc<dyn Fn(DispatchEvent) -> std::result::Result<(), HandlerError> + Send + Sync>;

/// Callback that settles later
pub type AsyncHandler = Arc<
    dyn Fn(DispatchEvent) -> BoxFuture<'static, std::result::Result<(), HandlerError>>
        + Send
        + Sync,
>;

/// A callable prop
#[derive(Clone)]
pub enum Callback {
    Sync(SyncHandler),
    Async(AsyncHandler),
}

impl Callback {
    pub fn sync<F, R>(f: F) -> Self
    where
        F: Fn(DispatchEvent) -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        Callback::Sync(Arc::new(move |evt| f(evt).into_outcome()))
    }

    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(DispatchEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), HandlerError>> + Send + 'static,
    {
        Callback::Async(Arc::new(move |evt| f(evt).boxed()))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Callback::Async(_))
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Sync(_) => f.write_str("Callback::Sync(..)"),
            Callback::Async(_) => f.write_str("Callback::Async(..)"),
        }
    }
}

/// A single property value
#[derive(Clone, Debug, Default)]
pub enum PropValue {
    Callback(Callback),
    Data(serde_json::Value),
    /// Declared but unset
    #[default]
    Undefined,
}

impl PropValue {
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            PropValue::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            PropValue::Data(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Callback> for PropValue {
    fn from(cb: Callback) -> Self {
        PropValue::Callback(cb)
    }
}

impl From<Option<Callback>> for PropValue {
    fn from(cb: Option<Callback>) -> Self {
        cb.map_or(PropValue::Undefined, PropValue::Callback)
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        PropValue::Data(value)
    }
}

/// Immutable mapping from prop names to values
///
/// Shared as `Arc<Props>`; a new mapping means a new `Arc`, and the `Arc`'s
/// identity is what dispatchers are keyed on.
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: FxHashMap<String, PropValue>,
}

impl Props {
    pub fn builder() -> PropsBuilder {
        PropsBuilder::new()
    }

    pub fn get(&self, prop_name: &str) -> Option<&PropValue> {
        self.entries.get(prop_name)
    }

    /// The callback stored under `prop_name`, if the prop is callable
    pub fn callback(&self, prop_name: &str) -> Option<&Callback> {
        self.get(prop_name)?.as_callback()
    }

    pub fn contains(&self, prop_name: &str) -> bool {
        self.entries.contains_key(prop_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Events that currently have a callback bound, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, value)| value.as_callback().is_some())
            .filter_map(|(key, _)| prop_name_to_event_name(key))
            .collect();
        names.sort();
        names
    }
}

/// Builder for [`Props`] that validates callbacks as they are registered
///
/// Registration errors are held until [`build`](Self::build), which reports
/// the first one.
#[derive(Default)]
pub struct PropsBuilder {
    entries: FxHashMap<String, PropValue>,
    error: Option<EventoError>,
}

impl PropsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a synchronous handler to `event_name`
    pub fn on<F, R>(self, event_name: &str, f: F) -> Self
    where
        F: Fn(DispatchEvent) -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        self.on_callback(event_name, Callback::sync(f))
    }

    /// Bind a handler returning a future to `event_name`
    ///
    /// The future is polled once when the event is dispatched. Work after its
    /// first suspension point only happens while the returned `Dispatch` is
    /// polled.
    pub fn on_async<F, Fut>(self, event_name: &str, f: F) -> Self
    where
        F: Fn(DispatchEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), HandlerError>> + Send + 'static,
    {
        self.on_callback(event_name, Callback::future(f))
    }

    fn on_callback(mut self, event_name: &str, cb: Callback) -> Self {
        if let Err(e) = validate_event_name(event_name) {
            self.record(e);
            return self;
        }
        self.entries
            .insert(event_name_to_prop_name(event_name), PropValue::Callback(cb));
        self
    }

    /// Store a callback under an explicit prop name
    pub fn callback(mut self, prop_name: &str, cb: Callback) -> Self {
        if !is_callback_prop_name(prop_name) {
            self.record(EventoError::InvalidCallbackName(prop_name.to_string()));
            return self;
        }
        self.entries
            .insert(prop_name.to_string(), PropValue::Callback(cb));
        self
    }

    /// Store any value under `prop_name`
    ///
    /// Callback values still have to use a canonical callback name.
    pub fn set(self, prop_name: &str, value: impl Into<PropValue>) -> Self {
        match value.into() {
            PropValue::Callback(cb) => self.callback(prop_name, cb),
            other => {
                let mut this = self;
                this.entries.insert(prop_name.to_string(), other);
                this
            }
        }
    }

    /// Store a serializable data prop
    pub fn data<T: Serialize + ?Sized>(mut self, prop_name: &str, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries
                    .insert(prop_name.to_string(), PropValue::Data(value));
            }
            Err(source) => self.record(EventoError::Serialize {
                prop: prop_name.to_string(),
                source,
            }),
        }
        self
    }

    fn record(&mut self, error: EventoError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn build(self) -> Result<Arc<Props>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(Arc::new(Props {
                entries: self.entries,
            })),
        }
    }
}

/// Typed props that can be projected onto a [`Props`] mapping
///
/// Usually derived with `#[derive(EventProps)]`.
pub trait EventProps {
    /// Event names with a callback field, in declaration order
    const EVENTS: &'static [&'static str];

    fn to_props(&self) -> Result<Arc<Props>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_on_registers_under_callback_name() {
        let props = Props::builder()
            .on("jump", |_| ())
            .on("saveMario", |_| "ok")
            .build()
            .unwrap();
        assert!(props.callback("onJump").is_some());
        assert!(props.callback("onSaveMario").is_some());
        assert!(props.get("jump").is_none());
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_invalid_event_name_is_rejected() {
        let result = Props::builder().on("Jump", |_| ()).build();
        assert!(matches!(result, Err(EventoError::InvalidEventName { .. })));
    }

    #[test]
    fn test_invalid_callback_name_is_rejected() {
        let result = Props::builder()
            .callback("onjump", Callback::sync(|_| ()))
            .build();
        assert!(matches!(result, Err(EventoError::InvalidCallbackName(name)) if name == "onjump"));

        let result = Props::builder()
            .set("click", Callback::sync(|_| ()))
            .build();
        assert!(matches!(result, Err(EventoError::InvalidCallbackName(_))));
    }

    #[test]
    fn test_first_error_wins() {
        let result = Props::builder()
            .on("", |_| ())
            .callback("bad", Callback::sync(|_| ()))
            .build();
        assert!(matches!(result, Err(EventoError::InvalidEventName { .. })));
    }

    #[test]
    fn test_data_and_undefined_props() {
        let props = Props::builder()
            .data("color", "red")
            .set("onSaveMario", PropValue::Undefined)
            .set("test", json!({ "a": 1 }))
            .set("onShoot", None::<Callback>)
            .build()
            .unwrap();

        assert_eq!(props.get("color").and_then(PropValue::as_data), Some(&json!("red")));
        assert!(props.contains("onSaveMario"));
        assert!(props.callback("onSaveMario").is_none());
        assert!(props.callback("onShoot").is_none());
        assert!(props.event_names().is_empty());
    }

    #[test]
    fn test_event_names_lists_bound_callbacks() {
        let props = Props::builder()
            .on("shoot", |_| ())
            .on("jump", |_| ())
            .data("onRun", &1)
            .build()
            .unwrap();
        assert_eq!(props.event_names(), vec!["jump", "shoot"]);
    }

    #[test]
    fn test_into_outcome() {
        assert!(().into_outcome().is_ok());
        assert!(json!(null).into_outcome().is_ok());
        let ok: std::result::Result<bool, String> = Ok(true);
        assert!(ok.into_outcome().is_ok());
        let err: std::result::Result<(), &str> = Err("boom");
        assert_eq!(err.into_outcome().unwrap_err().to_string(), "boom");
    }

    #[test]
    fn test_callback_kinds() {
        assert!(!Callback::sync(|_| ()).is_async());
        assert!(Callback::future(|_| async { Ok::<(), HandlerError>(()) }).is_async());
    }
}
