//! Field descriptors for prompt dialogs.
//!
//! The dialog service never looks inside a descriptor; it hands the list to
//! the modal host as-is. Only the host decides how a field is drawn and
//! validated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Values collected by a prompt, keyed by field name.
pub type FieldValues = BTreeMap<String, Value>;

/// How a field's input should be treated by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text.
    #[default]
    Text,
    /// Text that is masked while typing.
    Password,
    /// A number; submitted as a JSON number.
    Number,
}

impl FieldKind {
    /// Parse a kind name as used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "password" => Some(Self::Password),
            "number" => Some(Self::Number),
            _ => None,
        }
    }
}

/// One input field of a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Key of the field in the submitted values; unique within a prompt.
    pub name: String,
    /// Label shown next to the input.
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Initial value of the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldDescriptor {
    /// Create a plain text field.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Text,
            default: None,
            required: false,
            placeholder: None,
        }
    }

    /// Set the field kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the initial value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set placeholder text shown while the input is empty.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}
