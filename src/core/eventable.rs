//! Eventable: an Extendable whose construction delegates its `events` table.

use std::rc::Rc;

use compact_str::CompactString;
use serde_json::Value;

use super::extendable::{ConstructError, Extendable, Instance, Member, TypeSpec};

/// Member name under which a type declares its event table.
pub const EVENTS: &str = "events";

/// Ordered `event name -> handler name` pairs, one per event name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTable {
    entries: Vec<(CompactString, CompactString)>,
}

impl EventTable {
    /// A repeated event name keeps its first position and takes the later
    /// handler.
    pub fn from_pairs<I, E, H>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, H)>,
        E: Into<CompactString>,
        H: Into<CompactString>,
    {
        let mut table = Self::default();
        for (event, handler) in pairs {
            table.insert(event.into(), handler.into());
        }
        table
    }

    fn insert(&mut self, event: CompactString, handler: CompactString) {
        match self.entries.iter_mut().find(|entry| entry.0 == event) {
            Some(entry) => entry.1 = handler,
            None => self.entries.push((event, handler)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(e, h)| (e.as_str(), h.as_str()))
    }

    pub fn handler_for(&self, event: &str) -> Option<&str> {
        self.iter().find(|(e, _)| *e == event).map(|(_, h)| h)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The Eventable base type. Subtypes declare `events` with
/// [`TypeSpec::events`]; the table is bound once when an instance is built.
pub fn eventable() -> Extendable {
    Extendable::root().extend([TypeSpec::named("Eventable")
        .events(std::iter::empty::<(&str, &str)>())
        .constructor(|instance| {
            let table = resolved_events(instance);
            delegate_events(instance, &table)
        })])
}

fn resolved_events(instance: &Instance) -> EventTable {
    match instance.type_def().member(EVENTS) {
        Some(Member::Events(table)) => table.clone(),
        _ => EventTable::default(),
    }
}

/// Binds every `(event, handler)` pair in `table` to a method on `instance`.
///
/// A handler that does not name a method is a wiring defect and fails the
/// whole construction.
pub fn delegate_events(instance: &mut Instance, table: &EventTable) -> Result<(), ConstructError> {
    for (event, handler) in table.iter() {
        let method = match instance.type_def().member(handler) {
            Some(Member::Method(m)) => Rc::clone(m),
            _ => {
                tracing::error!(
                    type_name = %instance.type_def().name(),
                    event,
                    handler,
                    "event bound to missing handler"
                );
                return Err(ConstructError::MissingHandler {
                    type_name: instance.type_def().name().into(),
                    event: event.into(),
                    handler: handler.into(),
                });
            }
        };
        instance.on(
            event,
            Rc::new(move |target: &mut Instance, payload: &Value| {
                method(target, payload);
            }),
        );
    }

    tracing::debug!(
        type_name = %instance.type_def().name(),
        bound = table.len(),
        "events delegated"
    );
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/core/eventable.rs"]
mod tests;
