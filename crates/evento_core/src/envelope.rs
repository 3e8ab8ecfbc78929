//! Synthetic event envelopes for plain payloads
//!
//! Data dispatched with an event is boxed into a [`CustomEvent`] whose `detail`
//! carries the payload. Hosts either offer a one-step constructor or only the
//! legacy create-then-initialize sequence; both yield the same envelope.

use crate::events::now_millis;
use crate::inspect::{Inspect, Member, Payload};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

/// Envelope carrying a dispatched payload
#[derive(Debug)]
pub struct CustomEvent {
    event_type: String,
    detail: Option<Payload>,
    bubbles: bool,
    cancelable: bool,
    time_stamp: f64,
    initialized: bool,
    default_prevented: AtomicBool,
    propagation_stopped: AtomicBool,
}

impl CustomEvent {
    /// Construct an initialized, non-bubbling, non-cancelable envelope
    pub fn new(event_type: impl Into<String>, detail: Option<Payload>) -> Self {
        Self {
            event_type: event_type.into(),
            detail,
            bubbles: false,
            cancelable: false,
            time_stamp: now_millis() as f64,
            initialized: true,
            default_prevented: AtomicBool::new(false),
            propagation_stopped: AtomicBool::new(false),
        }
    }

    /// Create an uninitialized envelope for [`init_custom_event`](Self::init_custom_event)
    pub fn blank() -> Self {
        Self {
            event_type: String::new(),
            detail: None,
            bubbles: false,
            cancelable: false,
            time_stamp: now_millis() as f64,
            initialized: false,
            default_prevented: AtomicBool::new(false),
            propagation_stopped: AtomicBool::new(false),
        }
    }

    /// Legacy second construction step
    pub fn init_custom_event(
        &mut self,
        event_type: impl Into<String>,
        bubbles: bool,
        cancelable: bool,
        detail: Option<Payload>,
    ) {
        self.event_type = event_type.into();
        self.bubbles = bubbles;
        self.cancelable = cancelable;
        self.detail = detail;
        self.initialized = true;
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The wrapped payload; `None` when the event was dispatched without one
    pub fn detail(&self) -> Option<&Payload> {
        self.detail.as_ref()
    }

    /// Borrow the payload as its concrete type
    pub fn detail_as<T: 'static>(&self) -> Option<&T> {
        self.detail.as_ref()?.as_any().downcast_ref::<T>()
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.store(true, Ordering::Relaxed);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::Relaxed)
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::Relaxed)
    }
}

impl Inspect for CustomEvent {
    fn member(&self, name: &str) -> Option<Member<'_>> {
        Some(match name {
            "type" => Member::Str(&self.event_type),
            "detail" => match &self.detail {
                Some(_) => Member::Object,
                None => Member::Undefined,
            },
            "bubbles" => Member::Bool(self.bubbles),
            "cancelable" => Member::Bool(self.cancelable),
            "defaultPrevented" => Member::Bool(self.default_prevented()),
            "isTrusted" => Member::Bool(false),
            "eventPhase" => Member::Number(0.0),
            "timeStamp" => Member::Number(self.time_stamp),
            "target" | "currentTarget" => Member::Null,
            "preventDefault" | "stopPropagation" | "initCustomEvent" => Member::Method,
            _ => return None,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// What the hosting environment can do when building envelopes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostCapabilities {
    /// One-step `CustomEvent` construction is available
    pub event_constructor: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            event_constructor: true,
        }
    }
}

/// How envelopes are constructed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStrategy {
    /// Pick based on [`HostCapabilities`]
    #[default]
    Auto,
    Constructor,
    Legacy,
}

impl EnvelopeStrategy {
    /// Resolve `Auto` against the host's capabilities
    pub fn resolve(self, caps: HostCapabilities) -> EnvelopeStrategy {
        match self {
            EnvelopeStrategy::Auto if caps.event_constructor => EnvelopeStrategy::Constructor,
            EnvelopeStrategy::Auto => EnvelopeStrategy::Legacy,
            other => other,
        }
    }
}

/// Wrap `detail` into an envelope of type `event_name`
pub fn wrap(event_name: &str, detail: Option<Payload>) -> CustomEvent {
    wrap_with(
        EnvelopeStrategy::Auto,
        HostCapabilities::default(),
        event_name,
        detail,
    )
}

/// Wrap `detail` using an explicit construction path
pub fn wrap_with(
    strategy: EnvelopeStrategy,
    caps: HostCapabilities,
    event_name: &str,
    detail: Option<Payload>,
) -> CustomEvent {
    match strategy.resolve(caps) {
        EnvelopeStrategy::Legacy => {
            let mut evt = CustomEvent::blank();
            evt.init_custom_event(event_name, false, false, detail);
            evt
        }
        _ => CustomEvent::new(event_name, detail),
    }
}
