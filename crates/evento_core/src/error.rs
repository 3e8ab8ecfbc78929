//! Dispatch error types

use thiserror::Error;

/// Error raised by a handler, either synchronously or from its returned future
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Dispatch-related errors
///
/// A missing handler and a payload that is not shaped like a native event are
/// not errors: the first resolves the dispatch with `false`, the second just
/// selects the wrapping path.
#[derive(Error, Debug)]
pub enum EventoError {
    /// Event name is not lower-camel-case
    #[error("Invalid event name {name:?}: {reason}")]
    InvalidEventName { name: String, reason: &'static str },

    /// Event is not among the names the props declare
    #[error("Unknown event {event:?}: not declared by the component's props")]
    UnknownEvent { event: String },

    /// A callback was registered under a non-canonical prop name
    #[error("Invalid callback prop name {0:?}: expected `on` followed by an uppercase letter")]
    InvalidCallbackName(String),

    /// Synchronous handler failure, propagated to the dispatch call-site
    #[error("Handler for {event:?} failed: {source}")]
    Handler {
        event: String,
        #[source]
        source: HandlerError,
    },

    /// Future returned by an async handler failed
    #[error("Handler future for {event:?} was rejected: {source}")]
    Rejected {
        event: String,
        #[source]
        source: HandlerError,
    },

    /// Props accessor was read outside the window in which it is valid
    #[error("Props are not available for {event:?}; dispatch outside of render")]
    PropsUnavailable { event: String },

    /// A data prop could not be converted
    #[error("Failed to serialize prop {prop:?}: {source}")]
    Serialize {
        prop: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, EventoError>;
