use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::end::EndStateView;
use super::endpoint::{SchemaError, Side};
use super::view::StateView;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    NotFound(String),
    AlreadyRegistered(String),
    EmptyTypeName,
    InvalidSchema { type_name: String, error: SchemaError },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NotFound(name) => write!(f, "State type not found: {}", name),
            RegistryError::AlreadyRegistered(name) => {
                write!(f, "State type already registered: {}", name)
            }
            RegistryError::EmptyTypeName => write!(f, "State type name must not be empty"),
            RegistryError::InvalidSchema { type_name, error } => {
                write!(f, "Invalid endpoint schema for {}: {}", type_name, error)
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::InvalidSchema { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// `typeName -> state type`, handed to the editor context at start-up.
pub struct StateRegistry {
    types: FxHashMap<&'static str, Rc<dyn StateView>>,
    sides: Vec<Side>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::with_sides(Side::default_set())
    }

    /// An empty registry that accepts endpoints on `sides` only.
    pub fn with_sides(sides: Vec<Side>) -> Self {
        Self {
            types: FxHashMap::default(),
            sides,
        }
    }

    /// Registers the built-in state types.
    pub fn with_defaults(sides: Vec<Side>) -> Result<Self> {
        let mut registry = Self::with_sides(sides);
        registry.register(EndStateView::new())?;
        Ok(registry)
    }

    pub fn register<S: StateView + 'static>(&mut self, state_type: S) -> Result<()> {
        self.register_rc(Rc::new(state_type))
    }

    pub fn register_rc(&mut self, state_type: Rc<dyn StateView>) -> Result<()> {
        let name = state_type.type_name();
        if name.is_empty() {
            return Err(RegistryError::EmptyTypeName);
        }
        if self.types.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        state_type
            .endpoint_schema()
            .validate(&self.sides)
            .map_err(|error| RegistryError::InvalidSchema {
                type_name: name.to_string(),
                error,
            })?;

        tracing::debug!(type_name = name, "state type registered");
        self.types.insert(name, state_type);
        Ok(())
    }

    pub fn get(&self, type_name: &str) -> Option<&Rc<dyn StateView>> {
        self.types.get(type_name)
    }

    pub fn resolve(&self, type_name: &str) -> Result<Rc<dyn StateView>> {
        self.get(type_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(type_name.to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn remove(&mut self, type_name: &str) -> Option<Rc<dyn StateView>> {
        self.types.remove(type_name)
    }

    /// Sorted, for stable UI listings.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.types.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/states/registry.rs"]
mod tests;
