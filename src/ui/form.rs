//! Input state for prompt dialogs.
//!
//! Each field keeps its own text buffer and cursor. Cursor positions are
//! counted in characters, not bytes, so multi-byte input edits cleanly.

use crossterm::event::{KeyCode, KeyModifiers};
use serde_json::{Map, Number, Value};

use crate::field::{FieldDescriptor, FieldKind};

use super::modal::ModalAction;

/// Character shown in place of each password character.
const MASK_CHAR: char = '•';

/// One editable field of a prompt.
#[derive(Debug, Clone)]
pub struct FieldInput {
    pub descriptor: FieldDescriptor,
    value: String,
    cursor: usize,
}

impl FieldInput {
    /// Create an input pre-filled with the field's default.
    pub fn new(descriptor: FieldDescriptor) -> Self {
        let value = match &descriptor.default {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let cursor = value.chars().count();
        Self {
            descriptor,
            value,
            cursor,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Text as it should appear on screen.
    pub fn display(&self) -> String {
        match self.descriptor.kind {
            FieldKind::Password => MASK_CHAR.to_string().repeat(self.value.chars().count()),
            FieldKind::Text | FieldKind::Number => self.value.clone(),
        }
    }

    /// Turn the typed text into the submitted value.
    pub fn parse(&self) -> Result<Value, String> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            if self.descriptor.required {
                return Err(format!("{} is required", self.descriptor.label));
            }
            if self.descriptor.kind == FieldKind::Number {
                return Ok(Value::Null);
            }
        }

        match self.descriptor.kind {
            FieldKind::Text | FieldKind::Password => Ok(Value::String(self.value.clone())),
            FieldKind::Number => {
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Ok(Value::Number(n.into()));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("{} must be a number", self.descriptor.label))
            }
        }
    }
}

/// Editable state of a whole prompt.
#[derive(Debug, Clone)]
pub struct PromptForm {
    pub fields: Vec<FieldInput>,
    focused: usize,
    error: Option<String>,
}

impl PromptForm {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields: fields.into_iter().map(FieldInput::new).collect(),
            focused: 0,
            error: None,
        }
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn focused_field(&mut self) -> Option<&mut FieldInput> {
        self.fields.get_mut(self.focused)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Collect every field's value, or focus the first invalid one.
    pub fn submit(&mut self) -> Option<Value> {
        let mut values = Map::new();
        for (index, field) in self.fields.iter().enumerate() {
            match field.parse() {
                Ok(value) => {
                    values.insert(field.descriptor.name.clone(), value);
                }
                Err(message) => {
                    self.focused = index;
                    self.error = Some(message);
                    return None;
                }
            }
        }
        self.error = None;
        Some(Value::Object(values))
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> ModalAction {
        match key {
            KeyCode::Esc => return ModalAction::Dismiss,
            KeyCode::Enter => {
                return match self.submit() {
                    Some(values) => ModalAction::Submit(values),
                    None => ModalAction::Continue,
                };
            }
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            _ => {
                let Some(field) = self.focused_field() else {
                    return ModalAction::Continue;
                };
                match key {
                    KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                        field.insert(c)
                    }
                    KeyCode::Backspace => field.backspace(),
                    KeyCode::Delete => field.delete(),
                    KeyCode::Left => field.move_left(),
                    KeyCode::Right => field.move_right(),
                    KeyCode::Home => field.move_home(),
                    KeyCode::End => field.move_end(),
                    _ => return ModalAction::Continue,
                }
                // Editing clears a stale validation message.
                self.error = None;
            }
        }
        ModalAction::Continue
    }
}
