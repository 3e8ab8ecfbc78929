//! Host interaction events
//!
//! Platform input arrives as a [`NativeEvent`] and is handed to callbacks as a
//! [`SyntheticEvent`], the framework-native interaction event. Synthetic
//! events are shared behind `Arc`, so their mutable flags are atomics.

use crate::inspect::{Inspect, Member};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    /// Pointer down and up on the same target
    pub const CLICK: EventType = 8;
    pub const FOCUS: EventType = 10;
    pub const BLUR: EventType = 11;
    pub const KEY_DOWN: EventType = 20;
    pub const KEY_UP: EventType = 21;
    /// Text input event (for character input, IME composition)
    pub const TEXT_INPUT: EventType = 22;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;

    /// Script-facing name of an event type
    pub fn name(event_type: EventType) -> &'static str {
        match event_type {
            POINTER_DOWN => "pointerdown",
            POINTER_UP => "pointerup",
            POINTER_MOVE => "pointermove",
            POINTER_ENTER => "pointerenter",
            POINTER_LEAVE => "pointerleave",
            CLICK => "click",
            FOCUS => "focus",
            BLUR => "blur",
            KEY_DOWN => "keydown",
            KEY_UP => "keyup",
            TEXT_INPUT => "input",
            SCROLL => "scroll",
            RESIZE => "resize",
            _ => "unknown",
        }
    }

    /// Whether events of this type propagate to ancestors
    pub fn bubbles(event_type: EventType) -> bool {
        !matches!(
            event_type,
            POINTER_ENTER | POINTER_LEAVE | FOCUS | BLUR | RESIZE
        )
    }
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer {
        x: f32,
        y: f32,
        button: u8,
    },
    Key {
        key: String,
        modifiers: Modifiers,
        /// Whether this is a repeat event
        repeat: bool,
    },
    /// Text input from keyboard or IME
    TextInput {
        text: String,
    },
    Scroll {
        delta_x: f32,
        delta_y: f32,
    },
    Resize {
        width: u32,
        height: u32,
    },
    None,
}

/// Keyboard modifier flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: u8 = 0b0001;
    pub const CTRL: u8 = 0b0010;
    pub const ALT: u8 = 0b0100;
    pub const META: u8 = 0b1000;

    pub const fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if alt {
            bits |= Self::ALT;
        }
        if meta {
            bits |= Self::META;
        }
        Self { bits }
    }

    pub const fn shift(&self) -> bool {
        self.bits & Self::SHIFT != 0
    }

    pub const fn ctrl(&self) -> bool {
        self.bits & Self::CTRL != 0
    }

    pub const fn alt(&self) -> bool {
        self.bits & Self::ALT != 0
    }

    pub const fn meta(&self) -> bool {
        self.bits & Self::META != 0
    }
}

/// Raw event as delivered by the platform layer
#[derive(Clone, Debug)]
pub struct NativeEvent {
    pub event_type: EventType,
    /// Widget ID the platform hit-tested
    pub target: u64,
    pub data: EventData,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl NativeEvent {
    pub fn new(event_type: EventType, target: u64, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
            timestamp: now_millis(),
        }
    }
}

/// Propagation phase of a synthetic event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum EventPhase {
    #[default]
    None = 0,
    Capturing = 1,
    AtTarget = 2,
    Bubbling = 3,
}

/// Framework-native interaction event passed to callbacks
#[derive(Debug)]
pub struct SyntheticEvent {
    event_type: String,
    target: u64,
    current_target: u64,
    native_event: Arc<NativeEvent>,
    bubbles: bool,
    cancelable: bool,
    is_trusted: bool,
    phase: EventPhase,
    time_stamp: f64,
    default_prevented: AtomicBool,
    propagation_stopped: AtomicBool,
    persisted: AtomicBool,
}

impl SyntheticEvent {
    /// Wrap a platform event observed at its own target
    pub fn from_native(native: NativeEvent) -> Self {
        let event_type = native.event_type;
        Self {
            event_type: event_types::name(event_type).to_string(),
            target: native.target,
            current_target: native.target,
            bubbles: event_types::bubbles(event_type),
            cancelable: true,
            is_trusted: true,
            phase: EventPhase::AtTarget,
            time_stamp: native.timestamp as f64,
            native_event: Arc::new(native),
            default_prevented: AtomicBool::new(false),
            propagation_stopped: AtomicBool::new(false),
            persisted: AtomicBool::new(false),
        }
    }

    /// Re-target the event at an ancestor during bubbling
    pub fn with_current_target(mut self, current_target: u64) -> Self {
        self.current_target = current_target;
        self.phase = if current_target == self.target {
            EventPhase::AtTarget
        } else {
            EventPhase::Bubbling
        };
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn current_target(&self) -> u64 {
        self.current_target
    }

    pub fn native_event(&self) -> &NativeEvent {
        &self.native_event
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn is_trusted(&self) -> bool {
        self.is_trusted
    }

    /// Cancel the default action; ignored for non-cancelable events
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.store(true, Ordering::Relaxed);
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::Relaxed)
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::Relaxed)
    }

    /// Keep the event alive past the handler that received it
    pub fn persist(&self) {
        self.persisted.store(true, Ordering::Relaxed);
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted.load(Ordering::Relaxed)
    }
}

impl Inspect for SyntheticEvent {
    fn member(&self, name: &str) -> Option<Member<'_>> {
        Some(match name {
            "type" => Member::Str(&self.event_type),
            "bubbles" => Member::Bool(self.bubbles),
            "cancelable" => Member::Bool(self.cancelable),
            "defaultPrevented" => Member::Bool(self.is_default_prevented()),
            "isTrusted" => Member::Bool(self.is_trusted),
            "eventPhase" => Member::Number(self.phase as u8 as f64),
            "timeStamp" => Member::Number(self.time_stamp),
            "target" | "currentTarget" | "nativeEvent" => Member::Object,
            "preventDefault" | "isDefaultPrevented" | "stopPropagation"
            | "isPropagationStopped" | "persist" | "isPersistent" => Member::Method,
            _ => return None,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
