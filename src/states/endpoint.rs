//! Endpoint schema: where a state's connection handles live.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StateId;

/// Edge of the rendered node a handle is drawn on. By convention `Left` is
/// incoming and `Right` outgoing; direction is enforced by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }

    pub fn parse(value: &str) -> Option<Side> {
        match value {
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            "top" => Some(Side::Top),
            "bottom" => Some(Side::Bottom),
            _ => None,
        }
    }

    pub fn default_set() -> Vec<Side> {
        vec![Side::Left, Side::Right]
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    NotAList,
    MissingAttr { index: usize },
    MissingSide { index: usize },
    EmptyAttr { index: usize },
    UnknownSide { index: usize, side: String },
    SideNotAllowed { attr: CompactString, side: Side },
    DuplicateEndpoint { attr: CompactString, side: Side },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NotAList => write!(f, "endpoint schema must be a list"),
            SchemaError::MissingAttr { index } => {
                write!(f, "endpoint #{} is missing 'attr'", index)
            }
            SchemaError::MissingSide { index } => {
                write!(f, "endpoint #{} is missing 'side'", index)
            }
            SchemaError::EmptyAttr { index } => write!(f, "endpoint #{} has an empty 'attr'", index),
            SchemaError::UnknownSide { index, side } => {
                write!(f, "endpoint #{} has unknown side '{}'", index, side)
            }
            SchemaError::SideNotAllowed { attr, side } => {
                write!(f, "endpoint '{}' uses side '{}' which is not enabled", attr, side)
            }
            SchemaError::DuplicateEndpoint { attr, side } => {
                write!(f, "endpoint '{}' on side '{}' is declared twice", attr, side)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub attr: CompactString,
    pub side: Side,
}

impl EndpointSpec {
    pub fn new(attr: &str, side: Side) -> Self {
        Self {
            attr: attr.into(),
            side,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointSchema {
    entries: Vec<EndpointSpec>,
}

impl EndpointSchema {
    pub fn new(entries: Vec<EndpointSpec>) -> Self {
        Self { entries }
    }

    /// Parses a declarative schema such as
    /// `[{"attr": "entry_endpoint", "side": "left"}]`.
    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let items = value.as_array().ok_or(SchemaError::NotAList)?;
        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let attr = item
                .get("attr")
                .and_then(Value::as_str)
                .ok_or(SchemaError::MissingAttr { index })?;
            if attr.is_empty() {
                return Err(SchemaError::EmptyAttr { index });
            }
            let side = item
                .get("side")
                .and_then(Value::as_str)
                .ok_or(SchemaError::MissingSide { index })?;
            let side = Side::parse(side).ok_or_else(|| SchemaError::UnknownSide {
                index,
                side: side.to_string(),
            })?;
            entries.push(EndpointSpec::new(attr, side));
        }
        Ok(Self { entries })
    }

    /// Checks the schema against the sides the editor recognises.
    pub fn validate(&self, allowed: &[Side]) -> Result<(), SchemaError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.attr.is_empty() {
                return Err(SchemaError::EmptyAttr { index });
            }
            if !allowed.contains(&entry.side) {
                return Err(SchemaError::SideNotAllowed {
                    attr: entry.attr.clone(),
                    side: entry.side,
                });
            }
            if self.entries[..index].contains(entry) {
                return Err(SchemaError::DuplicateEndpoint {
                    attr: entry.attr.clone(),
                    side: entry.side,
                });
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[EndpointSpec] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EndpointSpec> {
        self.entries.iter()
    }

    pub fn on_side(&self, side: Side) -> impl Iterator<Item = &EndpointSpec> {
        self.entries.iter().filter(move |e| e.side == side)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A connection point derived from one schema entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub state: StateId,
    pub attr: CompactString,
    pub side: Side,
    /// Current value of `attr` in the state's store, if set.
    pub value: Option<Value>,
}

impl Endpoint {
    pub fn same_point(&self, other: &Endpoint) -> bool {
        self.state == other.state && self.attr == other.attr && self.side == other.side
    }
}

#[cfg(test)]
#[path = "../../tests/unit/states/endpoint.rs"]
mod tests;
