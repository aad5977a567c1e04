//! Model layer: per-state attribute stores.

pub mod attributes;

pub use attributes::{
    set_shared, unset_shared, AttrChange, Attributes, ChangeListener, NotifyPolicy,
    SharedAttributes,
};
