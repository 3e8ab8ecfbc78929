//! Dispatcher configuration
//!
//! Hosts embed this as TOML, typically inside their own config file:
//!
//! ```toml
//! [dispatch]
//! strict_event_names = true
//!
//! [envelope]
//! strategy = "auto"
//! event_constructor = true
//! ```

use crate::envelope::{EnvelopeStrategy, HostCapabilities};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Top-level dispatcher configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventoConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub envelope: EnvelopeConfig,
}

/// Dispatch behavior
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Reject event names that are not lower-camel-case instead of mapping them
    #[serde(default = "default_true")]
    pub strict_event_names: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            strict_event_names: true,
        }
    }
}

/// Envelope construction
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnvelopeConfig {
    #[serde(default)]
    pub strategy: EnvelopeStrategy,
    /// Whether the host offers one-step envelope construction
    #[serde(default = "default_true")]
    pub event_constructor: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            strategy: EnvelopeStrategy::Auto,
            event_constructor: true,
        }
    }
}

impl EnvelopeConfig {
    pub fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            event_constructor: self.event_constructor,
        }
    }
}

fn default_true() -> bool {
    true
}

impl EventoConfig {
    /// Parse a configuration from TOML; missing tables use defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Configuration that maps any event name without validating it
    pub fn lenient() -> Self {
        Self {
            dispatch: DispatchConfig {
                strict_event_names: false,
            },
            ..Self::default()
        }
    }
}
