//! Core object framework
//!
//! - Extendable: single-parent type extension with chained construction
//! - Eventable: declarative event tables bound at construction
//! - Event: event bus and typed handler delegation
//! - Context: editor context (registry, stores, states)

pub mod context;
pub mod event;
pub mod eventable;
pub mod extendable;

pub use context::{ContextError, EditorContext};
pub use event::{EventBus, EventSource, Handler, Listener};
pub use eventable::{delegate_events, eventable, EventTable, EVENTS};
pub use extendable::{
    CallError, ConstructError, Constructor, Extendable, Instance, Member, Method, TypeSpec,
};
