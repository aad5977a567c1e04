use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;

use super::endpoint::Endpoint;
use super::view::{ActiveView, EditView, StateView, ViewContext, ViewError};
use super::{Mode, StateId};
use crate::model::{Attributes, SharedAttributes};

/// A node of the dialogue graph together with the view of its current mode.
///
/// The state never owns its store; it keeps a `Weak` handle and every view it
/// builds gets another one.
pub struct DialogueState {
    id: StateId,
    kind: Rc<dyn StateView>,
    model: Weak<RefCell<Attributes>>,
    view: ActiveView,
}

impl DialogueState {
    pub fn new(id: StateId, kind: Rc<dyn StateView>, model: &SharedAttributes, mode: Mode) -> Self {
        let model = Rc::downgrade(model);
        let ctx = ViewContext::new(id, kind.type_name(), model.clone());
        let view = ActiveView::build(&kind, mode, ctx);
        tracing::debug!(type_name = kind.type_name(), mode = mode.as_str(), "state created");
        Self {
            id,
            kind,
            model,
            view,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn kind(&self) -> &Rc<dyn StateView> {
        &self.kind
    }

    pub fn mode(&self) -> Mode {
        self.view.mode()
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn is_live(&self) -> bool {
        self.model.strong_count() > 0
    }

    /// Drops the current view and builds the one for `mode`. Unsaved surface
    /// input is discarded; nothing is committed implicitly. Returns `false`
    /// when the state is already in `mode`.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        let from = self.mode();
        if from == mode {
            return false;
        }
        let ctx = ViewContext::new(self.id, self.type_name(), self.model.clone());
        self.view = ActiveView::build(&self.kind, mode, ctx);
        tracing::debug!(
            type_name = self.type_name(),
            from = from.as_str(),
            to = mode.as_str(),
            "mode switched"
        );
        true
    }

    pub fn toggle_mode(&mut self) -> Mode {
        let next = self.mode().toggled();
        self.set_mode(next);
        next
    }

    pub fn render(&self) -> Result<String, ViewError> {
        self.view.render()
    }

    pub fn emit(&mut self, event: &str, payload: &Value) -> usize {
        self.view.emit(event, payload)
    }

    pub fn edit_view_mut(&mut self) -> Option<&mut dyn EditView> {
        self.view.as_edit_mut()
    }

    pub fn save(&mut self) -> Result<(), ViewError> {
        let view = self.view.as_edit_mut().ok_or(ViewError::NotEditing)?;
        view.save()?;
        Ok(())
    }

    /// Error left by the last event-driven save of the open edit view.
    pub fn last_save_error(&self) -> Option<&ViewError> {
        match &self.view {
            ActiveView::Edit(view) => view.last_error(),
            ActiveView::Preview(_) => None,
        }
    }

    /// One endpoint per schema entry, in schema order.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let model = self.model.upgrade();
        let model = model.as_ref().map(|m| m.borrow());
        self.kind
            .endpoint_schema()
            .iter()
            .map(|entry| Endpoint {
                state: self.id,
                attr: entry.attr.clone(),
                side: entry.side,
                value: model.as_ref().and_then(|m| m.get(&entry.attr)).cloned(),
            })
            .collect()
    }
}

impl std::fmt::Debug for DialogueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueState")
            .field("id", &self.id)
            .field("type_name", &self.type_name())
            .field("mode", &self.mode())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/states/state.rs"]
mod tests;
