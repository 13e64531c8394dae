//! Per-component listener registry.

use std::fmt;
use std::sync::Arc;

use strata_core::alloc::HashMap;

use crate::error::ListenerError;
use crate::event::{Event, EventKind};
use crate::processor::EventContext;

pub type ListenerResult = Result<(), ListenerError>;

type ListenerFn = dyn Fn(&Event, &mut EventContext<'_>) -> ListenerResult + Send + Sync;

/// Shared event callback.
///
/// Cloning a listener shares the callback, and equality is identity of the
/// shared callback, so the same `Listener` value can be registered under
/// several kinds and removed again later.
#[derive(Clone)]
pub struct Listener(Arc<ListenerFn>);

impl Listener {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Event, &mut EventContext<'_>) -> ListenerResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Listener that cannot fail.
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn(&Event, &mut EventContext<'_>) + Send + Sync + 'static,
    {
        Self::new(move |event, ctx| {
            f(event, ctx);
            Ok(())
        })
    }

    pub fn call(&self, event: &Event, ctx: &mut EventContext<'_>) -> ListenerResult {
        (self.0)(event, ctx)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", self.addr())
    }
}

/// Event kind to ordered listeners. Registration order is invocation order.
#[derive(Debug, Default, Clone)]
pub struct ListenerMap {
    listeners: HashMap<EventKind, Vec<Listener>>,
}

impl ListenerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. Registering the same listener twice makes it fire
    /// twice.
    pub fn add_listener(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Remove the first registration of `listener` under `kind`. Returns
    /// false if it was not registered.
    pub fn remove_listener(&mut self, kind: EventKind, listener: &Listener) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|l| l == listener) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.listeners.remove(&kind);
        }
        true
    }

    /// Snapshot of the listeners registered under `kind`.
    pub fn listeners(&self, kind: EventKind) -> Vec<Listener> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }

    pub fn len(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.listeners.keys().copied()
    }

    pub fn clear_kind(&mut self, kind: EventKind) {
        self.listeners.remove(&kind);
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
