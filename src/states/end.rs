//! End states: show a final message and close the session.

use serde_json::Value;

use super::endpoint::{EndpointSchema, EndpointSpec, Side};
use super::view::{
    EditView, EditViewBase, ModeView, PreviewView, StateView, Surface, ViewBase, ViewContext,
    ViewError,
};
use super::Mode;
use crate::core::event::{EventBus, EventSource, Handler};
use crate::utils::escape_html;

pub const TYPE_NAME: &str = "end";

const TEXT: &str = "text";
const EDIT_FIELDS: &[&str] = &[TEXT];

fn text_of(data: &Value) -> String {
    escape_html(data.get(TEXT).and_then(Value::as_str).unwrap_or_default())
}

pub fn edit_template(data: &Value) -> String {
    format!(
        "<div class=\"end-state edit\"><textarea class=\"{}\">{}</textarea></div>",
        TEXT,
        text_of(data)
    )
}

pub fn preview_template(data: &Value) -> String {
    format!(
        "<div class=\"end-state preview\"><p class=\"{}\">{}</p></div>",
        TEXT,
        text_of(data)
    )
}

pub struct EndStateEditView {
    base: EditViewBase,
    bus: EventBus<EndStateEditView>,
    last_error: Option<ViewError>,
}

impl EndStateEditView {
    pub fn new(ctx: ViewContext) -> Self {
        let mut view = Self {
            base: EditViewBase::new(ctx, edit_template, EDIT_FIELDS),
            bus: EventBus::new(),
            last_error: None,
        };
        view.delegate();
        view
    }

    /// Payload: `{"field": "text", "value": "..."}`.
    fn on_input(&mut self, payload: &Value) {
        let field = payload.get("field").and_then(Value::as_str).unwrap_or(TEXT);
        match payload.get("value").and_then(Value::as_str) {
            Some(value) => self.base.surface_mut().set_field(field, value),
            None => {
                self.base.surface_mut().clear_field(field);
            }
        }
    }

    fn on_save(&mut self, _payload: &Value) {
        let result = self.save().map(|_| ());
        if let Err(err) = &result {
            tracing::warn!(error = %err, "end state save from event failed");
        }
        self.last_error = result.err();
    }
}

impl EventSource for EndStateEditView {
    fn events() -> Vec<(&'static str, Handler<Self>)> {
        vec![
            ("input", Self::on_input as Handler<Self>),
            ("save", Self::on_save),
        ]
    }

    fn bus(&self) -> &EventBus<Self> {
        &self.bus
    }

    fn bus_mut(&mut self) -> &mut EventBus<Self> {
        &mut self.bus
    }
}

impl ModeView for EndStateEditView {
    fn mode(&self) -> Mode {
        Mode::Edit
    }

    fn context(&self) -> &ViewContext {
        self.base.context()
    }

    fn render(&self) -> Result<String, ViewError> {
        self.base.render()
    }

    fn emit(&mut self, event: &str, payload: &Value) -> usize {
        self.emit_event(event, payload)
    }
}

impl EditView for EndStateEditView {
    fn surface(&self) -> &Surface {
        self.base.surface()
    }

    fn surface_mut(&mut self) -> &mut Surface {
        self.base.surface_mut()
    }

    fn save(&mut self) -> Result<&mut dyn EditView, ViewError> {
        self.base.commit()?;
        Ok(self)
    }

    fn last_error(&self) -> Option<&ViewError> {
        self.last_error.as_ref()
    }
}

pub struct EndStatePreviewView {
    base: ViewBase,
}

impl EndStatePreviewView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            base: ViewBase::new(ctx, preview_template),
        }
    }
}

impl ModeView for EndStatePreviewView {
    fn mode(&self) -> Mode {
        Mode::Preview
    }

    fn context(&self) -> &ViewContext {
        self.base.context()
    }

    fn render(&self) -> Result<String, ViewError> {
        self.base.render()
    }
}

impl PreviewView for EndStatePreviewView {}

pub struct EndStateView {
    schema: EndpointSchema,
}

impl EndStateView {
    pub fn new() -> Self {
        Self {
            schema: EndpointSchema::new(vec![EndpointSpec::new("entry_endpoint", Side::Left)]),
        }
    }
}

impl Default for EndStateView {
    fn default() -> Self {
        Self::new()
    }
}

impl StateView for EndStateView {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn endpoint_schema(&self) -> &EndpointSchema {
        &self.schema
    }

    fn edit_view(&self, ctx: ViewContext) -> Box<dyn EditView> {
        Box::new(EndStateEditView::new(ctx))
    }

    fn preview_view(&self, ctx: ViewContext) -> Box<dyn PreviewView> {
        Box::new(EndStatePreviewView::new(ctx))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/states/end.rs"]
mod tests;
