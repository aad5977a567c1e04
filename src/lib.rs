//! dialogue-editor: state framework for a visual dialogue-flow editor.
//!
//! Modules:
//! - core: Extendable / Eventable primitives, event bus, editor context
//! - model: attribute stores with explicit notify policy
//! - states: state-type contract, edit/preview views, endpoint schema, registry
//! - config: editor settings
//! - logging: tracing setup

pub mod config;
pub mod core;
pub mod logging;
pub mod model;
pub mod states;
pub mod utils;

pub use crate::core::{EditorContext, Extendable, TypeSpec};
pub use crate::states::{Mode, StateRegistry, StateView};
