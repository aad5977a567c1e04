use std::cell::RefCell;
use std::rc::Rc;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether a write tells change listeners about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyPolicy {
    /// Used for writes that originate from the view listening to the store.
    Silent,
    #[default]
    Notify,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttrChange {
    pub key: CompactString,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

pub type ChangeListener = Rc<dyn Fn(&AttrChange)>;

/// Per-state attribute store. Owned by the hosting context and shared with
/// views through [`SharedAttributes`] / `Weak` handles.
#[derive(Default)]
pub struct Attributes {
    values: Map<String, Value>,
    listeners: Vec<ChangeListener>,
}

pub type SharedAttributes = Rc<RefCell<Attributes>>;

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-object values yield an empty store.
    pub fn from_json(value: Value) -> Self {
        let values = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            values,
            listeners: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedAttributes {
        Rc::new(RefCell::new(self))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns whether the stored value changed. Equal values are a no-op for
    /// both the store and its listeners.
    ///
    /// Listeners run before this returns. When the store sits behind a
    /// [`SharedAttributes`] handle, write through [`set_shared`] instead so
    /// listeners can read the store.
    pub fn set(&mut self, key: &str, value: impl Into<Value>, policy: NotifyPolicy) -> bool {
        match self.write(key, value.into()) {
            Some(change) => {
                fan_out(&change, &self.listeners_for(policy));
                true
            }
            None => false,
        }
    }

    pub fn unset(&mut self, key: &str, policy: NotifyPolicy) -> Option<Value> {
        let change = self.remove(key)?;
        fan_out(&change, &self.listeners_for(policy));
        change.old
    }

    pub fn on_change(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot handed to body templates.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }

    fn write(&mut self, key: &str, value: Value) -> Option<AttrChange> {
        if self.values.get(key) == Some(&value) {
            return None;
        }
        let old = self.values.insert(key.to_string(), value.clone());
        Some(AttrChange {
            key: key.into(),
            old,
            new: Some(value),
        })
    }

    fn remove(&mut self, key: &str) -> Option<AttrChange> {
        let old = self.values.remove(key)?;
        Some(AttrChange {
            key: key.into(),
            old: Some(old),
            new: None,
        })
    }

    fn listeners_for(&self, policy: NotifyPolicy) -> Vec<ChangeListener> {
        match policy {
            NotifyPolicy::Notify => self.listeners.clone(),
            NotifyPolicy::Silent => Vec::new(),
        }
    }
}

/// [`Attributes::set`] through a shared handle. The borrow is released before
/// listeners run, so a listener may read the store or render a view over it.
pub fn set_shared(
    model: &SharedAttributes,
    key: &str,
    value: impl Into<Value>,
    policy: NotifyPolicy,
) -> bool {
    let pending = {
        let mut attrs = model.borrow_mut();
        attrs
            .write(key, value.into())
            .map(|change| (change, attrs.listeners_for(policy)))
    };
    match pending {
        Some((change, listeners)) => {
            fan_out(&change, &listeners);
            true
        }
        None => false,
    }
}

/// [`Attributes::unset`] through a shared handle, with the same listener
/// ordering as [`set_shared`].
pub fn unset_shared(model: &SharedAttributes, key: &str, policy: NotifyPolicy) -> Option<Value> {
    let (change, listeners) = {
        let mut attrs = model.borrow_mut();
        let change = attrs.remove(key)?;
        let listeners = attrs.listeners_for(policy);
        (change, listeners)
    };
    fan_out(&change, &listeners);
    change.old
}

fn fan_out(change: &AttrChange, listeners: &[ChangeListener]) {
    if listeners.is_empty() {
        return;
    }
    tracing::trace!(key = %change.key, listeners = listeners.len(), "attribute changed");
    for listener in listeners {
        listener(change);
    }
}

impl std::fmt::Debug for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attributes")
            .field("values", &self.values)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/attributes.rs"]
mod tests;
