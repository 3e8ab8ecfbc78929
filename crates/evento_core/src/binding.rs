//! Memoized dispatcher binding
//!
//! A component should hold on to one dispatcher for as long as its props
//! mapping is the same object, and get a fresh one as soon as the mapping is
//! replaced, so a dispatcher never closes over stale callbacks.

use crate::config::EventoConfig;
use crate::dispatcher::Evento;
use crate::props::Props;
use std::sync::Arc;

/// Caches the dispatcher for the most recent props mapping
#[derive(Debug, Default)]
pub struct EventoCache {
    current: Option<Evento>,
    config: EventoConfig,
    rebinds: usize,
}

impl EventoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EventoConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Dispatcher bound to `props`, rebuilt only when `props` is a different `Arc`
    pub fn bind(&mut self, props: &Arc<Props>) -> Evento {
        match &self.current {
            Some(evento) if evento.is_bound_to(props) => evento.clone(),
            _ => {
                let evento = Evento::with_config(props.clone(), self.config.clone());
                self.rebinds += 1;
                tracing::debug!(rebinds = self.rebinds, props = props.len(), "evento rebound");
                self.current = Some(evento.clone());
                evento
            }
        }
    }

    /// Number of times a dispatcher has been created
    pub fn rebind_count(&self) -> usize {
        self.rebinds
    }
}

/// Hook-style entry point: the dispatcher for this render's props
pub fn use_create_evento(cache: &mut EventoCache, props: &Arc<Props>) -> Evento {
    cache.bind(props)
}
