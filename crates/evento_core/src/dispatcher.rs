//! Event dispatch
//!
//! An [`Evento`] is bound to a component's current [`Props`]. Dispatching
//! `jump` looks up `onJump`, hands it either the forwarded interaction event
//! or a [`CustomEvent`](crate::envelope::CustomEvent) wrapping the payload, and
//! resolves once the callback is done.
//!
//! # Example
//!
//! ```
//! use evento_core::{Evento, Props};
//!
//! let props = Props::builder().on("jump", |_| "ok").build().unwrap();
//! let evento = Evento::new(props);
//!
//! let handled = pollster::block_on(evento.emit("jump").unwrap()).unwrap();
//! assert!(handled);
//!
//! let handled = pollster::block_on(evento.emit("shoot").unwrap()).unwrap();
//! assert!(!handled);
//! ```

use crate::classify::is_native_payload;
use crate::config::EventoConfig;
use crate::envelope::wrap_with;
use crate::error::{EventoError, Result};
use crate::inspect::{payload, Inspect, Payload};
use crate::naming::{event_name_to_prop_name, validate_event_name};
use crate::props::{Callback, DispatchEvent, Props};
use futures::future::{self, BoxFuture};
use futures::task::noop_waker_ref;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Supplies the props in effect at dispatch time
///
/// Returns `None` once the props can no longer be read, e.g. after the render
/// pass that produced them has ended.
pub type PropsAccessor = Arc<dyn Fn() -> Option<Arc<Props>> + Send + Sync>;

#[derive(Clone)]
enum PropsSource {
    Snapshot(Arc<Props>),
    Accessor(PropsAccessor),
}

/// Dispatcher bound to one component's props
#[derive(Clone)]
pub struct Evento {
    source: PropsSource,
    config: Arc<EventoConfig>,
    declared: Option<&'static [&'static str]>,
}

impl Evento {
    /// Bind to a props snapshot
    pub fn new(props: Arc<Props>) -> Self {
        Self::with_config(props, EventoConfig::default())
    }

    pub fn with_config(props: Arc<Props>, config: EventoConfig) -> Self {
        Self {
            source: PropsSource::Snapshot(props),
            config: Arc::new(config),
            declared: None,
        }
    }

    /// Resolve props through `accessor` on every dispatch
    pub fn from_accessor<F>(accessor: F) -> Self
    where
        F: Fn() -> Option<Arc<Props>> + Send + Sync + 'static,
    {
        Self::from_accessor_with_config(accessor, EventoConfig::default())
    }

    pub fn from_accessor_with_config<F>(accessor: F, config: EventoConfig) -> Self
    where
        F: Fn() -> Option<Arc<Props>> + Send + Sync + 'static,
    {
        Self {
            source: PropsSource::Accessor(Arc::new(accessor)),
            config: Arc::new(config),
            declared: None,
        }
    }

    /// Only accept the given event names
    ///
    /// Dispatching any other name fails with [`EventoError::UnknownEvent`].
    /// A declared event whose callback is missing still resolves `false`.
    pub fn with_declared_events(mut self, events: &'static [&'static str]) -> Self {
        self.declared = Some(events);
        self
    }

    /// Event names this dispatcher is restricted to, if any
    pub fn declared_events(&self) -> Option<&'static [&'static str]> {
        self.declared
    }

    pub fn config(&self) -> &EventoConfig {
        &self.config
    }

    /// Props this dispatcher currently resolves to
    pub fn props(&self) -> Option<Arc<Props>> {
        match &self.source {
            PropsSource::Snapshot(props) => Some(props.clone()),
            PropsSource::Accessor(accessor) => accessor(),
        }
    }

    /// Whether this dispatcher is bound to exactly `props`
    pub fn is_bound_to(&self, props: &Arc<Props>) -> bool {
        match &self.source {
            PropsSource::Snapshot(bound) => Arc::ptr_eq(bound, props),
            PropsSource::Accessor(_) => false,
        }
    }

    /// Dispatch `event_name` to its callback prop
    ///
    /// Returns an error right away when the event name is rejected or not
    /// declared, the props are unavailable, or a synchronous handler fails.
    /// Otherwise the returned [`Dispatch`] resolves to `true` once the handler
    /// has run (or its future has fulfilled), and to `false` when no callable
    /// prop is bound.
    ///
    /// A handler future is polled once before `dispatch` returns, so its body
    /// runs up to the first suspension point even if the [`Dispatch`] is
    /// dropped.
    ///
    /// Handler panics are not caught.
    pub fn dispatch(&self, event_name: &str, payload: Option<Payload>) -> Result<Dispatch> {
        if self.config.dispatch.strict_event_names {
            validate_event_name(event_name)?;
        }
        if let Some(declared) = self.declared {
            if !declared.iter().any(|name| *name == event_name) {
                return Err(EventoError::UnknownEvent {
                    event: event_name.to_string(),
                });
            }
        }

        let props = self.props().ok_or_else(|| EventoError::PropsUnavailable {
            event: event_name.to_string(),
        })?;

        let prop_name = event_name_to_prop_name(event_name);
        let Some(callback) = props.callback(&prop_name) else {
            tracing::debug!(event = event_name, prop = %prop_name, "no handler bound");
            return Ok(Dispatch::ready(false));
        };

        let forwarded = is_native_payload(payload.as_deref());
        tracing::trace!(event = event_name, prop = %prop_name, forwarded, "dispatching");

        let arg = match payload {
            Some(payload) if forwarded => DispatchEvent::Forwarded(payload),
            detail => {
                let envelope = &self.config.envelope;
                DispatchEvent::Custom(Arc::new(wrap_with(
                    envelope.strategy,
                    envelope.capabilities(),
                    event_name,
                    detail,
                )))
            }
        };

        match callback {
            Callback::Sync(handler) => {
                handler(arg).map_err(|source| EventoError::Handler {
                    event: event_name.to_string(),
                    source,
                })?;
                Ok(Dispatch::ready(true))
            }
            Callback::Async(handler) => {
                let event = event_name.to_string();
                let mut pending = handler(arg)
                    .map(move |outcome| {
                        outcome
                            .map(|()| true)
                            .map_err(|source| EventoError::Rejected { event, source })
                    })
                    .boxed();

                let mut cx = Context::from_waker(noop_waker_ref());
                match pending.as_mut().poll(&mut cx) {
                    Poll::Ready(outcome) => Ok(Dispatch::settled(outcome)),
                    Poll::Pending => Ok(Dispatch::pending(pending)),
                }
            }
        }
    }

    /// Dispatch without a payload; the handler sees an undefined `detail`
    pub fn emit(&self, event_name: &str) -> Result<Dispatch> {
        self.dispatch(event_name, None)
    }

    /// Dispatch with `detail` as the payload
    pub fn emit_with<T: Inspect>(&self, event_name: &str, detail: T) -> Result<Dispatch> {
        self.dispatch(event_name, Some(payload(detail)))
    }
}

impl fmt::Debug for Evento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            PropsSource::Snapshot(props) => format!("Snapshot({} props)", props.len()),
            PropsSource::Accessor(_) => "Accessor".to_string(),
        };
        f.debug_struct("Evento")
            .field("source", &source)
            .field("config", &self.config)
            .field("declared", &self.declared)
            .finish()
    }
}

/// Outcome of a single dispatch
///
/// Resolves to `Ok(true)` when a handler ran, `Ok(false)` when none was
/// bound, and `Err(EventoError::Rejected)` when a handler's future failed.
///
/// Dropping it does not cancel the handler's work up to its first suspension
/// point, which has already run; anything after it only runs when polled.
#[must_use = "a pending dispatch does not settle unless polled"]
pub struct Dispatch {
    inner: BoxFuture<'static, Result<bool>>,
    ready: bool,
}

impl Dispatch {
    fn ready(handled: bool) -> Self {
        Self::settled(Ok(handled))
    }

    fn settled(outcome: Result<bool>) -> Self {
        Self {
            inner: future::ready(outcome).boxed(),
            ready: true,
        }
    }

    fn pending(inner: BoxFuture<'static, Result<bool>>) -> Self {
        Self {
            inner,
            ready: false,
        }
    }

    /// Whether the outcome was known when `dispatch` returned
    ///
    /// True for sync handlers, unbound events and handler futures that
    /// completed on their first poll.
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

impl Future for Dispatch {
    type Output = Result<bool>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeStrategy;
    use crate::error::HandlerError;
    use crate::events::{event_types, EventData, NativeEvent, SyntheticEvent};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (calls.clone(), calls)
    }

    #[test]
    fn test_unbound_event_resolves_false() {
        let evento = Evento::new(Props::builder().build().unwrap());
        let dispatch = evento.emit("jump").unwrap();
        assert!(dispatch.is_ready());
        assert!(!pollster::block_on(dispatch).unwrap());
    }

    #[test]
    fn test_sync_handler_resolves_true() {
        let (calls, seen) = counter();
        let props = Props::builder()
            .on("jump", move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                "ok"
            })
            .build()
            .unwrap();
        let evento = Evento::new(props);

        let dispatch = evento.emit("jump").unwrap();
        assert!(dispatch.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(pollster::block_on(dispatch).unwrap());
    }

    #[test]
    fn test_handler_runs_before_dispatch_returns() {
        let (calls, seen) = counter();
        let props = Props::builder()
            .on("jump", move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        let _dispatch = Evento::new(props).emit("jump").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sync_failure_propagates() {
        let props = Props::builder()
            .on("jump", |_| Err::<(), _>("no ground"))
            .build()
            .unwrap();
        let err = Evento::new(props).emit("jump").unwrap_err();
        match err {
            EventoError::Handler { event, source } => {
                assert_eq!(event, "jump");
                assert_eq!(source.to_string(), "no ground");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    #[should_panic(expected = "handler bug")]
    fn test_panics_are_not_caught() {
        let props = Props::builder()
            .on("jump", |_| -> () { panic!("handler bug") })
            .build()
            .unwrap();
        let _ = Evento::new(props).emit("jump");
    }

    #[test]
    fn test_strict_mode_rejects_capitalized_names() {
        let props = Props::builder().on("jump", |_| ()).build().unwrap();

        let strict = Evento::new(props.clone());
        assert!(matches!(
            strict.emit("Jump"),
            Err(EventoError::InvalidEventName { .. })
        ));

        let lenient = Evento::with_config(props, EventoConfig::lenient());
        assert!(pollster::block_on(lenient.emit("Jump").unwrap()).unwrap());
    }

    #[test]
    fn test_plain_payload_is_wrapped() {
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let props = Props::builder()
            .on("shoot", move |evt| {
                *sink.lock().unwrap() = Some(evt);
            })
            .build()
            .unwrap();

        let evento = Evento::new(props);
        assert!(pollster::block_on(evento.emit_with("shoot", "...Mariooo!").unwrap()).unwrap());

        let evt = received.lock().unwrap().take().unwrap();
        assert_eq!(evt.event_type(), Some("shoot"));
        assert_eq!(evt.detail_as::<&str>(), Some(&"...Mariooo!"));
        assert!(evt.forwarded().is_none());
    }

    #[test]
    fn test_native_payload_is_forwarded() {
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let props = Props::builder()
            .on("forwardedClick", move |evt| {
                *sink.lock().unwrap() = Some(evt);
            })
            .build()
            .unwrap();

        let click: Payload = Arc::new(SyntheticEvent::from_native(NativeEvent::new(
            event_types::CLICK,
            9,
            EventData::None,
        )));
        let evento = Evento::new(props);
        assert!(
            pollster::block_on(evento.dispatch("forwardedClick", Some(click.clone())).unwrap())
                .unwrap()
        );

        let evt = received.lock().unwrap().take().unwrap();
        assert!(Arc::ptr_eq(evt.forwarded().unwrap(), &click));
        assert_eq!(evt.event_type(), Some("click"));
        assert_eq!(evt.downcast::<SyntheticEvent>().map(|e| e.target()), Some(9));
    }

    #[test]
    fn test_envelope_strategy_from_config() {
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let props = Props::builder()
            .on("run", move |evt| {
                *sink.lock().unwrap() = Some(evt);
            })
            .build()
            .unwrap();

        let mut config = EventoConfig::default();
        config.envelope.strategy = EnvelopeStrategy::Legacy;
        let evento = Evento::with_config(props, config);
        let _ = pollster::block_on(evento.emit_with("run", 3i32).unwrap());

        let evt = received.lock().unwrap().take().unwrap();
        let custom = evt.as_custom().unwrap();
        assert!(custom.is_initialized());
        assert_eq!(custom.event_type(), "run");
        assert_eq!(custom.detail_as::<i32>(), Some(&3));
    }

    #[test]
    fn test_accessor_outside_render_fails_fast() {
        let current: Arc<Mutex<Option<Arc<Props>>>> = Arc::new(Mutex::new(None));
        let reader = current.clone();
        let evento = Evento::from_accessor(move || reader.lock().unwrap().clone());

        assert!(matches!(
            evento.emit("saveMario"),
            Err(EventoError::PropsUnavailable { .. })
        ));

        *current.lock().unwrap() = Some(Props::builder().on("saveMario", |_| ()).build().unwrap());
        assert!(pollster::block_on(evento.emit("saveMario").unwrap()).unwrap());
    }

    #[test]
    fn test_async_body_runs_without_polling() {
        let (calls, seen) = counter();
        let props = Props::builder()
            .on_async("save", move |_| {
                let seen = seen.clone();
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), HandlerError>(())
                }
            })
            .build()
            .unwrap();

        let evento = Evento::new(props);
        drop(evento.emit("save").unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let dispatch = evento.emit("save").unwrap();
        assert!(dispatch.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(pollster::block_on(dispatch).unwrap());
    }

    #[test]
    fn test_async_rejection_on_first_poll() {
        let props = Props::builder()
            .on_async("save", |_| async { Err::<(), _>(HandlerError::from("disk full")) })
            .build()
            .unwrap();

        let dispatch = Evento::new(props).emit("save").unwrap();
        assert!(dispatch.is_ready());
        assert!(matches!(
            pollster::block_on(dispatch),
            Err(EventoError::Rejected { .. })
        ));
    }

    #[test]
    fn test_undeclared_event_fails_fast() {
        let props = Props::builder().on("jump", |_| ()).build().unwrap();
        let evento = Evento::new(props).with_declared_events(&["jump", "shoot"]);

        match evento.emit("jmup") {
            Err(EventoError::UnknownEvent { event }) => assert_eq!(event, "jmup"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(pollster::block_on(evento.emit("jump").unwrap()).unwrap());
        assert!(!pollster::block_on(evento.emit("shoot").unwrap()).unwrap());
    }

    #[test]
    fn test_accessor_with_config() {
        let props = Props::builder().on("jump", |_| ()).build().unwrap();
        let evento = Evento::from_accessor_with_config(
            move || Some(props.clone()),
            EventoConfig::lenient(),
        );
        assert!(!evento.config().dispatch.strict_event_names);
        assert!(pollster::block_on(evento.emit("Jump").unwrap()).unwrap());
    }

    #[test]
    fn test_is_bound_to_compares_identity() {
        let props = Props::builder().build().unwrap();
        let same_content = Props::builder().build().unwrap();
        let evento = Evento::new(props.clone());
        assert!(evento.is_bound_to(&props));
        assert!(!evento.is_bound_to(&same_content));
    }
}
