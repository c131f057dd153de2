//! Pre-call hooks.
//!
//! The forwarder announces each outbound call to an [`EventDispatcher`]
//! before making it. Listeners get mutable access to the event and may
//! augment it; whatever they leave behind is what gets sent.

use std::collections::HashMap;

use crate::types::{ActionEvent, IdentifyEvent};

pub const BEFORE_CREATE_CUSTOMER: &str = "customerio.beforeCreateCustomer";
pub const BEFORE_FIRE_EVENT: &str = "customerio.beforeFireEvent";

pub enum Hook<'a> {
    BeforeCreateCustomer(&'a mut IdentifyEvent),
    BeforeFireEvent(&'a mut ActionEvent),
}

impl Hook<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Hook::BeforeCreateCustomer(_) => BEFORE_CREATE_CUSTOMER,
            Hook::BeforeFireEvent(_) => BEFORE_FIRE_EVENT,
        }
    }
}

/// Synchronously notifies listeners. Listener failures are the
/// dispatcher's business; the forwarder never sees them.
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, hook: Hook<'_>);
}

pub struct NoopDispatcher;

impl EventDispatcher for NoopDispatcher {
    fn dispatch(&self, _hook: Hook<'_>) {}
}

type Listener = Box<dyn Fn(&mut Hook<'_>) + Send + Sync>;

/// Listener table keyed by hook name, for hosts without a bus of their own.
/// Listeners for one hook run in registration order.
#[derive(Default)]
pub struct Listeners {
    by_name: HashMap<&'static str, Vec<Listener>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, name: &'static str, listener: F) -> Self
    where
        F: Fn(&mut Hook<'_>) + Send + Sync + 'static,
    {
        self.by_name.entry(name).or_default().push(Box::new(listener));
        self
    }

    pub fn on_before_create_customer<F>(self, listener: F) -> Self
    where
        F: Fn(&mut IdentifyEvent) + Send + Sync + 'static,
    {
        self.on(BEFORE_CREATE_CUSTOMER, move |hook| {
            if let Hook::BeforeCreateCustomer(event) = hook {
                listener(event);
            }
        })
    }

    pub fn on_before_fire_event<F>(self, listener: F) -> Self
    where
        F: Fn(&mut ActionEvent) + Send + Sync + 'static,
    {
        self.on(BEFORE_FIRE_EVENT, move |hook| {
            if let Hook::BeforeFireEvent(event) = hook {
                listener(event);
            }
        })
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.by_name.get(name).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.values().all(Vec::is_empty)
    }
}

impl EventDispatcher for Listeners {
    fn dispatch(&self, mut hook: Hook<'_>) {
        if let Some(listeners) = self.by_name.get(hook.name()) {
            for listener in listeners {
                listener(&mut hook);
            }
        }
    }
}
