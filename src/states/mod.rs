//! Dialogue states: the state-type contract, its views and the built-in types.

pub mod end;
pub mod endpoint;
pub mod registry;
pub mod state;
pub mod view;

use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    pub struct StateId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Edit,
    #[default]
    Preview,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Edit => Mode::Preview,
            Mode::Preview => Mode::Edit,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Edit => "edit",
            Mode::Preview => "preview",
        }
    }
}

pub use end::{EndStateEditView, EndStatePreviewView, EndStateView};
pub use endpoint::{Endpoint, EndpointSchema, EndpointSpec, SchemaError, Side};
pub use registry::{RegistryError, StateRegistry};
pub use state::DialogueState;
pub use view::{
    ActiveView, BodyTemplate, EditView, EditViewBase, ModeView, PreviewView, StateView, Surface,
    ViewBase, ViewContext, ViewError,
};
