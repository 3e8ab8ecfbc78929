//! Components that receive a dispatcher alongside their props

use crate::binding::EventoCache;
use crate::config::EventoConfig;
use crate::dispatcher::Evento;
use crate::error::Result;
use crate::props::EventProps;
use std::ops::Deref;

/// Props handed to a wrapped component: the caller's props plus a dispatcher
#[derive(Debug)]
pub struct HocProps<P> {
    props: P,
    pub evento: Evento,
}

impl<P> HocProps<P> {
    pub fn into_inner(self) -> P {
        self.props
    }
}

impl<P> Deref for HocProps<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.props
    }
}

/// A component that dispatches events through its callback props
pub trait Component {
    type Props: EventProps;

    /// Render with the current props
    fn render(&mut self, props: &HocProps<Self::Props>) -> Result<()>;
}

/// Wraps a component so that it is given a dispatcher bound to its props
pub struct WithEvento<C> {
    inner: C,
    cache: EventoCache,
}

impl<C: Component> WithEvento<C> {
    pub fn new(inner: C) -> Self {
        Self::with_config(inner, EventoConfig::default())
    }

    pub fn with_config(inner: C, config: EventoConfig) -> Self {
        Self {
            inner,
            cache: EventoCache::with_config(config),
        }
    }

    /// Project `props`, bind a dispatcher and render the wrapped component
    ///
    /// The dispatcher only accepts the events `C::Props` declares. Returns the
    /// props together with the dispatcher so callers can keep dispatching
    /// after the render.
    pub fn render(&mut self, props: C::Props) -> Result<HocProps<C::Props>> {
        let mapping = props.to_props()?;
        let evento = self
            .cache
            .bind(&mapping)
            .with_declared_events(<C::Props as EventProps>::EVENTS);
        let hoc_props = HocProps { props, evento };
        self.inner.render(&hoc_props)?;
        Ok(hoc_props)
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Number of dispatchers created so far
    pub fn rebind_count(&self) -> usize {
        self.cache.rebind_count()
    }
}

/// Wrap `component` so it renders with a bound dispatcher
pub fn with_evento<C: Component>(component: C) -> WithEvento<C> {
    WithEvento::new(component)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventoError;
    use crate::props::{Callback, Props};
    use std::sync::{Arc, Mutex};

    struct ShroomProps {
        on_eat_me: Option<Callback>,
    }

    impl EventProps for ShroomProps {
        const EVENTS: &'static [&'static str] = &["eatMe"];

        fn to_props(&self) -> Result<Arc<Props>> {
            Props::builder()
                .set("onEatMe", self.on_eat_me.clone())
                .build()
        }
    }

    #[derive(Default)]
    struct Shroom {
        handled: Vec<bool>,
    }

    impl Component for Shroom {
        type Props = ShroomProps;

        fn render(&mut self, props: &HocProps<ShroomProps>) -> Result<()> {
            let handled = pollster::block_on(
                props
                    .evento
                    .emit_with("eatMe", "I'll give you super-powers!")?,
            )?;
            self.handled.push(handled);
            Ok(())
        }
    }

    #[test]
    fn test_wrapped_component_dispatches_to_caller() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let on_eat_me = Callback::sync(move |evt| {
            let detail = evt.detail_as::<&str>().map(|s| s.to_string());
            sink.lock().unwrap().push(detail);
        });

        let mut shroom = with_evento(Shroom::default());
        let hoc_props = shroom
            .render(ShroomProps {
                on_eat_me: Some(on_eat_me),
            })
            .unwrap();

        assert_eq!(shroom.inner().handled, vec![true]);
        assert_eq!(
            received.lock().unwrap().as_slice(),
            &[Some("I'll give you super-powers!".to_string())]
        );
        assert!(hoc_props.on_eat_me.is_some());
    }

    #[test]
    fn test_missing_callback_resolves_false() {
        let mut shroom = with_evento(Shroom::default());
        shroom.render(ShroomProps { on_eat_me: None }).unwrap();
        assert_eq!(shroom.inner().handled, vec![false]);
    }

    /// Emits whatever event name it was built with
    struct Goomba {
        event: &'static str,
        handled: Vec<bool>,
    }

    impl Component for Goomba {
        type Props = ShroomProps;

        fn render(&mut self, props: &HocProps<ShroomProps>) -> Result<()> {
            let handled = pollster::block_on(props.evento.emit(self.event)?)?;
            self.handled.push(handled);
            Ok(())
        }
    }

    #[test]
    fn test_undeclared_event_is_rejected() {
        let mut goomba = with_evento(Goomba {
            event: "eatMee",
            handled: Vec::new(),
        });
        let result = goomba.render(ShroomProps {
            on_eat_me: Some(Callback::sync(|_| ())),
        });
        let Err(err) = result else {
            panic!("typo event was dispatched");
        };
        assert!(matches!(err, EventoError::UnknownEvent { event } if event == "eatMee"));
        assert!(goomba.inner().handled.is_empty());
    }

    #[test]
    fn test_declared_event_without_callback_resolves_false() {
        let mut goomba = with_evento(Goomba {
            event: "eatMe",
            handled: Vec::new(),
        });
        let hoc_props = goomba.render(ShroomProps { on_eat_me: None }).unwrap();
        assert_eq!(goomba.inner().handled, vec![false]);
        assert_eq!(hoc_props.evento.declared_events(), Some(ShroomProps::EVENTS));
    }

    #[test]
    fn test_each_render_rebinds() {
        let mut shroom = with_evento(Shroom::default());
        shroom.render(ShroomProps { on_eat_me: None }).unwrap();
        shroom.render(ShroomProps { on_eat_me: None }).unwrap();
        assert_eq!(shroom.rebind_count(), 2);
    }
}
