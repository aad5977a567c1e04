//! Event bus and compile-time checked handler delegation.
//!
//! `EventBus<R>` keeps ordered listeners per event name. Every listener gets
//! the receiver it was bound to, so the handler's receiver does not depend on
//! who emits.

use std::rc::Rc;

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde_json::Value;

pub type Listener<R> = Rc<dyn Fn(&mut R, &Value)>;

/// Typed handler declared on a type, see [`EventSource::events`].
pub type Handler<T> = fn(&mut T, &Value);

pub struct EventBus<R> {
    listeners: FxHashMap<CompactString, Vec<Listener<R>>>,
}

impl<R> EventBus<R> {
    pub fn new() -> Self {
        Self {
            listeners: FxHashMap::default(),
        }
    }

    pub fn on(&mut self, event: &str, listener: Listener<R>) {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(listener);
    }

    pub fn off(&mut self, event: &str) -> usize {
        self.listeners.remove(event).map_or(0, |l| l.len())
    }

    /// Snapshot of the listeners for `event`, in registration order.
    pub fn listeners(&self, event: &str) -> Vec<Listener<R>> {
        self.listeners.get(event).cloned().unwrap_or_default()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.listeners.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<R> Default for EventBus<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// A type that owns an [`EventBus`] bound to itself.
///
/// `events()` is declared per type and replaces, never merges with, the table
/// of whatever the type embeds. A wrapper that wants the inner handlers has to
/// list them again.
pub trait EventSource: Sized + 'static {
    fn events() -> Vec<(&'static str, Handler<Self>)> {
        Vec::new()
    }

    fn bus(&self) -> &EventBus<Self>;

    fn bus_mut(&mut self) -> &mut EventBus<Self>;

    /// Registers `events()` on the bus. Call once, from the constructor.
    fn delegate(&mut self) {
        for (event, handler) in Self::events() {
            self.bus_mut()
                .on(event, Rc::new(move |target: &mut Self, payload: &Value| {
                    handler(target, payload)
                }));
        }
    }

    fn emit_event(&mut self, event: &str, payload: &Value) -> usize {
        let listeners = self.bus().listeners(event);
        for listener in &listeners {
            listener(self, payload);
        }
        listeners.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/event.rs"]
mod tests;
