//! View contracts shared by every state type.
//!
//! A state type implements [`StateView`] and hands out one edit view and one
//! preview view. Both are built from the base structs here and differ only in
//! their template and, for edit views, the fields they commit.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::endpoint::EndpointSchema;
use super::{Mode, StateId};
use crate::model::{Attributes, NotifyPolicy, SharedAttributes};

/// Pure function from the state's attribute snapshot to markup.
pub type BodyTemplate = fn(&Value) -> String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The store behind the view was dropped, e.g. the state was deleted
    /// while its edit view was open.
    StateGone { type_name: &'static str },
    MissingInput { field: CompactString },
    NotEditing,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::StateGone { type_name } => {
                write!(f, "{} state no longer exists", type_name)
            }
            ViewError::MissingInput { field } => write!(f, "no input for field '{}'", field),
            ViewError::NotEditing => write!(f, "state is not in edit mode"),
        }
    }
}

impl std::error::Error for ViewError {}

#[derive(Debug, Clone)]
pub struct ViewContext {
    state: StateId,
    type_name: &'static str,
    model: Weak<RefCell<Attributes>>,
}

impl ViewContext {
    pub fn new(state: StateId, type_name: &'static str, model: Weak<RefCell<Attributes>>) -> Self {
        Self {
            state,
            type_name,
            model,
        }
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn model(&self) -> Result<SharedAttributes, ViewError> {
        self.model.upgrade().ok_or(ViewError::StateGone {
            type_name: self.type_name,
        })
    }

    pub fn is_live(&self) -> bool {
        self.model.strong_count() > 0
    }
}

/// Input fields of an edit view, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    fields: FxHashMap<CompactString, String>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn clear_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub trait ModeView {
    fn mode(&self) -> Mode;

    fn context(&self) -> &ViewContext;

    fn render(&self) -> Result<String, ViewError>;

    /// Delivers `event` to the handlers the view delegated at construction.
    fn emit(&mut self, _event: &str, _payload: &Value) -> usize {
        0
    }
}

/// Read-only rendering.
pub trait PreviewView: ModeView {}

pub trait EditView: ModeView {
    fn surface(&self) -> &Surface;

    fn surface_mut(&mut self) -> &mut Surface;

    /// Commits the surface into the store without notifying store listeners.
    fn save(&mut self) -> Result<&mut dyn EditView, ViewError>;

    /// Outcome of the last save triggered through an event, where no caller
    /// receives the `Result`. Cleared by the next successful one.
    fn last_error(&self) -> Option<&ViewError> {
        None
    }
}

/// Contract every concrete state type implements.
pub trait StateView {
    fn type_name(&self) -> &'static str;

    fn endpoint_schema(&self) -> &EndpointSchema;

    fn edit_view(&self, ctx: ViewContext) -> Box<dyn EditView>;

    fn preview_view(&self, ctx: ViewContext) -> Box<dyn PreviewView>;
}

pub struct ViewBase {
    ctx: ViewContext,
    template: BodyTemplate,
}

impl ViewBase {
    pub fn new(ctx: ViewContext, template: BodyTemplate) -> Self {
        Self { ctx, template }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    pub fn render(&self) -> Result<String, ViewError> {
        let model = self.ctx.model()?;
        let data = model.borrow().to_json();
        Ok((self.template)(&data))
    }
}

pub struct EditViewBase {
    view: ViewBase,
    surface: Surface,
    fields: &'static [&'static str],
}

impl EditViewBase {
    /// Seeds the surface with the current string values of `fields`.
    pub fn new(ctx: ViewContext, template: BodyTemplate, fields: &'static [&'static str]) -> Self {
        let mut surface = Surface::new();
        if let Ok(model) = ctx.model() {
            let model = model.borrow();
            for field in fields {
                if let Some(value) = model.get_str(field) {
                    surface.set_field(field, value);
                }
            }
        }
        Self {
            view: ViewBase::new(ctx, template),
            surface,
            fields,
        }
    }

    pub fn context(&self) -> &ViewContext {
        self.view.context()
    }

    pub fn render(&self) -> Result<String, ViewError> {
        self.view.render()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Writes every field silently. Nothing is written unless all fields have
    /// input.
    pub fn commit(&self) -> Result<usize, ViewError> {
        let model = self.view.context().model().map_err(|err| {
            tracing::warn!(
                type_name = self.context().type_name(),
                "save skipped: state no longer exists"
            );
            err
        })?;

        let mut values = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let value = self
                .surface
                .field(field)
                .ok_or_else(|| ViewError::MissingInput {
                    field: (*field).into(),
                })?;
            values.push((*field, value));
        }

        let mut model = model.borrow_mut();
        let mut changed = 0;
        for (field, value) in values {
            if model.set(field, value, NotifyPolicy::Silent) {
                changed += 1;
            }
        }

        tracing::debug!(
            type_name = self.context().type_name(),
            changed,
            "edit view saved"
        );
        Ok(changed)
    }
}

/// Whichever view the state's current mode needs.
pub enum ActiveView {
    Edit(Box<dyn EditView>),
    Preview(Box<dyn PreviewView>),
}

impl ActiveView {
    pub fn build(kind: &Rc<dyn StateView>, mode: Mode, ctx: ViewContext) -> Self {
        match mode {
            Mode::Edit => ActiveView::Edit(kind.edit_view(ctx)),
            Mode::Preview => ActiveView::Preview(kind.preview_view(ctx)),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            ActiveView::Edit(v) => v.mode(),
            ActiveView::Preview(v) => v.mode(),
        }
    }

    pub fn render(&self) -> Result<String, ViewError> {
        match self {
            ActiveView::Edit(v) => v.render(),
            ActiveView::Preview(v) => v.render(),
        }
    }

    pub fn emit(&mut self, event: &str, payload: &Value) -> usize {
        match self {
            ActiveView::Edit(v) => v.emit(event, payload),
            ActiveView::Preview(v) => v.emit(event, payload),
        }
    }

    pub fn as_edit_mut(&mut self) -> Option<&mut dyn EditView> {
        match self {
            ActiveView::Edit(v) => Some(v.as_mut()),
            ActiveView::Preview(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/states/view.rs"]
mod tests;
