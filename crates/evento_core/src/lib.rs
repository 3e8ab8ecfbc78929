//! Evento Core
//!
//! Lets a component fire named events at whatever callbacks its caller passed
//! in, without knowing the callback props by name:
//!
//! - **Name mapping**: event `jump` is handled by the prop `onJump`
//! - **Props**: typed callback props, validated when registered
//! - **Dispatch**: forwards interaction events untouched, wraps any other
//!   payload into a [`CustomEvent`], and resolves to whether a handler ran
//! - **Binding**: one dispatcher per props mapping, rebuilt when it changes
//!
//! # Example
//!
//! ```rust
//! use evento_core::{Evento, Props};
//!
//! let props = Props::builder()
//!     .on("jump", |evt| {
//!         assert_eq!(evt.detail_as::<&str>(), Some(&"it's a me..."));
//!     })
//!     .build()
//!     .unwrap();
//!
//! let evento = Evento::new(props);
//! let handled = pollster::block_on(evento.emit_with("jump", "it's a me...").unwrap());
//! assert!(handled.unwrap());
//! ```

pub mod binding;
pub mod classify;
pub mod component;
pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod events;
pub mod inspect;
pub mod naming;
pub mod props;

pub use binding::{use_create_evento, EventoCache};
pub use classify::looks_like_native_event;
pub use component::{with_evento, Component, HocProps, WithEvento};
pub use config::EventoConfig;
pub use dispatcher::{Dispatch, Evento};
pub use envelope::{wrap, CustomEvent};
pub use error::{EventoError, HandlerError, Result};
pub use events::{NativeEvent, SyntheticEvent};
pub use inspect::{payload, Inspect, Member, Payload};
pub use naming::event_name_to_prop_name;
pub use props::{Callback, DispatchEvent, EventProps, PropValue, Props, PropsBuilder};

#[cfg(feature = "derive")]
pub use evento_macros::EventProps;
