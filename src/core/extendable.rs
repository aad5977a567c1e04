//! Single-parent type extension with chained construction.
//!
//! An `Extendable` is an immutable type descriptor. `extend` folds one or more
//! `TypeSpec`s into a new descriptor whose parent is the receiver; instances
//! resolve members on their own type first, then up the parent chain.

use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::event::{EventBus, Listener};
use super::eventable::EventTable;

pub type Method = Rc<dyn Fn(&mut Instance, &Value) -> Value>;
pub type Constructor = Rc<dyn Fn(&mut Instance) -> Result<(), ConstructError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructError {
    MissingHandler {
        type_name: CompactString,
        event: CompactString,
        handler: CompactString,
    },
    Failed {
        type_name: CompactString,
        reason: String,
    },
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructError::MissingHandler {
                type_name,
                event,
                handler,
            } => write!(
                f,
                "{}: event '{}' is bound to missing handler '{}'",
                type_name, event, handler
            ),
            ConstructError::Failed { type_name, reason } => {
                write!(f, "{}: construction failed: {}", type_name, reason)
            }
        }
    }
}

impl std::error::Error for ConstructError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    NotFound(CompactString),
    NotCallable(CompactString),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::NotFound(name) => write!(f, "Member not found: {}", name),
            CallError::NotCallable(name) => write!(f, "Member is not callable: {}", name),
        }
    }
}

impl std::error::Error for CallError {}

#[derive(Clone)]
pub enum Member {
    Value(Value),
    Method(Method),
    Events(EventTable),
}

impl Member {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Member::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Member::Method(_))
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Member::Method(_) => f.write_str("Method(..)"),
            Member::Events(t) => f.debug_tuple("Events").field(t).finish(),
        }
    }
}

/// A partial type definition handed to [`Extendable::extend`].
#[derive(Clone, Default)]
pub struct TypeSpec {
    name: Option<CompactString>,
    members: FxHashMap<CompactString, Member>,
    constructor: Option<Constructor>,
}

impl TypeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), Member::Value(value.into()));
        self
    }

    pub fn method<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&mut Instance, &Value) -> Value + 'static,
    {
        self.members.insert(name.into(), Member::Method(Rc::new(f)));
        self
    }

    pub fn events<I, E, H>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, H)>,
        E: Into<CompactString>,
        H: Into<CompactString>,
    {
        self.members.insert(
            super::eventable::EVENTS.into(),
            Member::Events(EventTable::from_pairs(pairs)),
        );
        self
    }

    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), ConstructError> + 'static,
    {
        self.constructor = Some(Rc::new(f));
        self
    }

    /// Later specs win on every conflict, including the constructor.
    fn merge(mut self, other: TypeSpec) -> Self {
        if other.name.is_some() {
            self.name = other.name;
        }
        self.members.extend(other.members);
        if other.constructor.is_some() {
            self.constructor = other.constructor;
        }
        self
    }
}

struct TypeDef {
    name: CompactString,
    parent: Option<Extendable>,
    members: FxHashMap<CompactString, Member>,
    constructor: Option<Constructor>,
}

#[derive(Clone)]
pub struct Extendable(Rc<TypeDef>);

impl Extendable {
    pub fn root() -> Self {
        Self(Rc::new(TypeDef {
            name: "Extendable".into(),
            parent: None,
            members: FxHashMap::default(),
            constructor: None,
        }))
    }

    pub fn extend<I>(&self, specs: I) -> Extendable
    where
        I: IntoIterator<Item = TypeSpec>,
    {
        let spec = specs
            .into_iter()
            .fold(TypeSpec::default(), |acc, next| acc.merge(next));
        let name = spec.name.unwrap_or_else(|| self.0.name.clone());

        tracing::debug!(
            type_name = %name,
            parent = %self.0.name,
            members = spec.members.len(),
            "type extended"
        );

        Extendable(Rc::new(TypeDef {
            name,
            parent: Some(self.clone()),
            members: spec.members,
            constructor: spec.constructor,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The type this one was extended from. Fixed at `extend` time; a member
    /// named `parent` is an ordinary member and cannot override it.
    pub fn parent(&self) -> Option<&Extendable> {
        self.0.parent.as_ref()
    }

    pub fn own_member(&self, name: &str) -> Option<&Member> {
        self.0.members.get(name)
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.0
            .members
            .get(name)
            .or_else(|| self.0.parent.as_ref().and_then(|p| p.member(name)))
    }

    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// Walks from this type up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Extendable> {
        std::iter::successors(Some(self), |t| t.parent())
    }

    pub fn same_type(&self, other: &Extendable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_subtype_of(&self, other: &Extendable) -> bool {
        self.ancestors().any(|t| t.same_type(other))
    }

    pub fn construct(&self) -> Result<Instance, ConstructError> {
        let mut lineage: Vec<&Extendable> = self.ancestors().collect();
        lineage.reverse();

        let mut instance = Instance {
            ty: self.clone(),
            fields: FxHashMap::default(),
            bus: EventBus::new(),
        };
        for level in lineage {
            if let Some(ctor) = level.0.constructor.clone() {
                ctor(&mut instance)?;
            }
        }

        tracing::trace!(type_name = %self.0.name, "instance constructed");
        Ok(instance)
    }
}

impl fmt::Debug for Extendable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain: Vec<&str> = self.ancestors().map(|t| t.name()).collect();
        f.debug_struct("Extendable")
            .field("name", &self.0.name)
            .field("chain", &chain)
            .finish()
    }
}

pub struct Instance {
    ty: Extendable,
    fields: FxHashMap<CompactString, Value>,
    bus: EventBus<Instance>,
}

impl Instance {
    pub fn type_def(&self) -> &Extendable {
        &self.ty
    }

    /// Own fields shadow values declared on the type chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.fields.get(name) {
            return Some(v.clone());
        }
        self.ty.member(name).and_then(Member::as_value).cloned()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.ty.member(name).is_some_and(Member::is_method)
    }

    pub fn call(&mut self, name: &str, args: &Value) -> Result<Value, CallError> {
        let method = resolve_method(self.ty.member(name), name)?;
        Ok(method(self, args))
    }

    /// `super`-style call: resolves `name` starting at the parent of `from`.
    pub fn call_parent(
        &mut self,
        from: &Extendable,
        name: &str,
        args: &Value,
    ) -> Result<Value, CallError> {
        let member = from.parent().and_then(|p| p.member(name));
        let method = resolve_method(member, name)?;
        Ok(method(self, args))
    }

    pub fn on(&mut self, event: &str, listener: Listener<Instance>) {
        self.bus.on(event, listener);
    }

    pub fn off(&mut self, event: &str) -> usize {
        self.bus.off(event)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.bus.listener_count(event)
    }

    /// Returns the number of listeners invoked; unknown events invoke none.
    pub fn emit(&mut self, event: &str, payload: &Value) -> usize {
        let listeners = self.bus.listeners(event);
        for listener in &listeners {
            listener(self, payload);
        }
        listeners.len()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.ty.name())
            .field("fields", &self.fields)
            .finish()
    }
}

fn resolve_method(member: Option<&Member>, name: &str) -> Result<Method, CallError> {
    match member {
        Some(Member::Method(m)) => Ok(Rc::clone(m)),
        Some(_) => Err(CallError::NotCallable(name.into())),
        None => Err(CallError::NotFound(name.into())),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/extendable.rs"]
mod tests;
