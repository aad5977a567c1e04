//! Editor context: the explicit home of the state-type registry, the per-state
//! attribute stores and the live states.

use serde_json::{Map, Value};
use slotmap::{SecondaryMap, SlotMap};

use crate::config::EditorSettings;
use crate::model::{set_shared, Attributes, NotifyPolicy, SharedAttributes};
use crate::states::{
    DialogueState, Endpoint, Mode, RegistryError, StateId, StateRegistry, ViewError,
};
use crate::utils::pop_json;

/// Key carrying the state type in serialized states.
pub const TYPE_KEY: &str = "type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    UnknownState(StateId),
    Registry(RegistryError),
    MissingType,
    View(ViewError),
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextError::UnknownState(id) => write!(f, "Unknown state: {:?}", id),
            ContextError::Registry(e) => write!(f, "{}", e),
            ContextError::MissingType => write!(f, "Serialized state has no '{}'", TYPE_KEY),
            ContextError::View(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ContextError {}

impl From<RegistryError> for ContextError {
    fn from(e: RegistryError) -> Self {
        ContextError::Registry(e)
    }
}

impl From<ViewError> for ContextError {
    fn from(e: ViewError) -> Self {
        ContextError::View(e)
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;

pub struct EditorContext {
    registry: StateRegistry,
    settings: EditorSettings,
    models: SecondaryMap<StateId, SharedAttributes>,
    states: SlotMap<StateId, DialogueState>,
}

impl EditorContext {
    pub fn new(registry: StateRegistry, settings: EditorSettings) -> Self {
        Self {
            registry,
            settings,
            models: SecondaryMap::new(),
            states: SlotMap::with_key(),
        }
    }

    /// Built-in state types, with the sides enabled in `settings`.
    pub fn with_defaults(settings: EditorSettings) -> Result<Self> {
        let registry = StateRegistry::with_defaults(settings.sides.clone())?;
        Ok(Self::new(registry, settings))
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StateRegistry {
        &mut self.registry
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn add_state(&mut self, type_name: &str, attrs: Attributes) -> Result<StateId> {
        let kind = self.registry.resolve(type_name)?;
        let model = attrs.shared();
        let mode = self.settings.initial_mode;
        let id = self
            .states
            .insert_with_key(|id| DialogueState::new(id, kind, &model, mode));
        self.models.insert(id, model);
        Ok(id)
    }

    /// Builds a state from `{"type": "<typeName>", ...attributes}`.
    pub fn load_state(&mut self, data: &Value) -> Result<StateId> {
        let type_name = data
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .ok_or(ContextError::MissingType)?;
        let mut attrs = data.as_object().cloned().unwrap_or_default();
        pop_json(&mut attrs, TYPE_KEY);
        self.add_state(type_name, Attributes::from_json(Value::Object(attrs)))
    }

    /// Inverse of [`load_state`](Self::load_state). `None` for unknown ids or
    /// states whose store is gone.
    pub fn export_state(&self, id: StateId) -> Option<Value> {
        let state = self.states.get(id)?;
        let model = self.models.get(id)?;
        let mut out = Map::new();
        out.insert(TYPE_KEY.to_string(), Value::from(state.type_name()));
        if let Value::Object(attrs) = model.borrow().to_json() {
            out.extend(attrs);
        }
        Some(Value::Object(out))
    }

    pub fn state(&self, id: StateId) -> Option<&DialogueState> {
        self.states.get(id)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut DialogueState> {
        self.states.get_mut(id)
    }

    pub fn model(&self, id: StateId) -> Option<&SharedAttributes> {
        self.models.get(id)
    }

    /// Writes one attribute from outside the state's views. Listeners run
    /// after the store is released, so an open preview may re-render from them.
    pub fn set_attr(
        &self,
        id: StateId,
        key: &str,
        value: impl Into<Value>,
        policy: NotifyPolicy,
    ) -> Result<bool> {
        let model = self.models.get(id).ok_or(ContextError::UnknownState(id))?;
        Ok(set_shared(model, key, value, policy))
    }

    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.keys()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn switch_mode(&mut self, id: StateId, mode: Mode) -> Result<bool> {
        let state = self.state_mut_or_err(id)?;
        Ok(state.set_mode(mode))
    }

    pub fn render(&self, id: StateId) -> Result<String> {
        let state = self.states.get(id).ok_or(ContextError::UnknownState(id))?;
        Ok(state.render()?)
    }

    pub fn emit(&mut self, id: StateId, event: &str, payload: &Value) -> Result<usize> {
        let state = self.state_mut_or_err(id)?;
        Ok(state.emit(event, payload))
    }

    pub fn save(&mut self, id: StateId) -> Result<()> {
        let state = self.state_mut_or_err(id)?;
        state.save().map_err(|err| {
            tracing::warn!(error = %err, "save failed");
            ContextError::View(err)
        })
    }

    pub fn endpoints(&self, id: StateId) -> Result<Vec<Endpoint>> {
        let state = self.states.get(id).ok_or(ContextError::UnknownState(id))?;
        Ok(state.endpoints())
    }

    /// Drops the store while leaving the state (and any open view) in place,
    /// as happens when the model layer deletes a state mid-edit.
    pub fn drop_model(&mut self, id: StateId) -> bool {
        self.models.remove(id).is_some()
    }

    pub fn remove_state(&mut self, id: StateId) -> Option<DialogueState> {
        self.models.remove(id);
        let state = self.states.remove(id)?;
        tracing::debug!(type_name = state.type_name(), "state removed");
        Some(state)
    }

    fn state_mut_or_err(&mut self, id: StateId) -> Result<&mut DialogueState> {
        self.states.get_mut(id).ok_or(ContextError::UnknownState(id))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/context.rs"]
mod tests;
