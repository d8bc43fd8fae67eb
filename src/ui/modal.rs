//! Modal dialog views for the terminal host.
//!
//! A [`ModalDialog`] is built from a [`DialogDescriptor`] and knows how to
//! react to keys and draw itself. It never settles anything; it only reports
//! a [`ModalAction`] and leaves settlement to the host.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use serde_json::Value;

use crate::config::{ProfileConfig, SizeProfile, ThemeConfig};
use crate::error::DialogError;
use crate::field::FieldDescriptor;
use crate::host::{Controller, DialogDescriptor, DialogId, TemplateRef};

use super::form::PromptForm;

/// Result of handling a key event in a dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalAction {
    /// Keep showing the dialog.
    Continue,
    /// Close the dialog with a value.
    Submit(Value),
    /// Close the dialog without a value.
    Dismiss,
}

/// A dialog action with label and key binding.
#[derive(Debug, Clone)]
pub struct DialogAction {
    /// Display label for the action.
    pub label: String,
    /// Key that triggers this action.
    pub key: KeyCode,
    /// Result when this action is triggered.
    pub result: ModalAction,
}

impl DialogAction {
    pub fn new(label: impl Into<String>, key: KeyCode, result: ModalAction) -> Self {
        Self {
            label: label.into(),
            key,
            result,
        }
    }

    /// Confirm with `true` (y key).
    pub fn yes() -> Self {
        Self::new("Yes", KeyCode::Char('y'), ModalAction::Submit(Value::Bool(true)))
    }

    /// Dismiss (n key).
    pub fn no() -> Self {
        Self::new("No", KeyCode::Char('n'), ModalAction::Dismiss)
    }

    /// Confirm with `true` (Enter key).
    pub fn accept(label: impl Into<String>) -> Self {
        Self::new(label, KeyCode::Enter, ModalAction::Submit(Value::Bool(true)))
    }

    /// Dismiss (Esc key).
    pub fn cancel(label: impl Into<String>) -> Self {
        Self::new(label, KeyCode::Esc, ModalAction::Dismiss)
    }

    fn key_name(&self) -> String {
        match self.key {
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Char(c) => c.to_string(),
            _ => "?".to_string(),
        }
    }
}

/// What the dialog shows.
#[derive(Debug, Clone)]
pub enum ModalContent {
    /// Message of a confirmation.
    Message(String),
    /// Editable fields of a prompt.
    Form(PromptForm),
}

/// A modal dialog.
#[derive(Debug, Clone)]
pub struct ModalDialog {
    pub id: DialogId,
    pub title: String,
    pub content: ModalContent,
    /// Actions listed in the footer. For confirmations they also drive key handling.
    pub actions: Vec<DialogAction>,
    pub size: SizeProfile,
}

impl ModalDialog {
    /// Create a confirmation dialog with Yes/No actions.
    pub fn confirm(
        id: DialogId,
        title: impl Into<String>,
        message: impl Into<String>,
        size: SizeProfile,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: ModalContent::Message(message.into()),
            actions: vec![
                DialogAction::yes(),
                DialogAction::no(),
                DialogAction::accept("Confirm"),
                DialogAction::cancel("Cancel"),
            ],
            size,
        }
    }

    /// Create a prompt dialog for the given fields.
    pub fn prompt(
        id: DialogId,
        title: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        size: SizeProfile,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: ModalContent::Form(PromptForm::new(fields)),
            actions: vec![
                DialogAction::accept("Submit"),
                DialogAction::new("Next field", KeyCode::Tab, ModalAction::Continue),
                DialogAction::cancel("Cancel"),
            ],
            size,
        }
    }

    /// Build the view a descriptor asks for.
    pub fn from_descriptor(
        descriptor: &DialogDescriptor,
        profiles: &ProfileConfig,
    ) -> Result<Self, DialogError> {
        let size = profiles.for_size(descriptor.size);
        let bindings = &descriptor.bindings;

        match descriptor.controller {
            Controller::Confirm if descriptor.template == TemplateRef::CONFIRM => Ok(Self::confirm(
                descriptor.id,
                bindings.get::<String>("title")?,
                bindings.get::<String>("message")?,
                size,
            )),
            Controller::Prompt if descriptor.template == TemplateRef::PROMPT => Ok(Self::prompt(
                descriptor.id,
                bindings.get::<String>("title")?,
                bindings.get::<Vec<FieldDescriptor>>("fields")?,
                size,
            )),
            controller => Err(DialogError::HostUnavailable(format!(
                "no view for template '{}' with {:?} controller",
                descriptor.template, controller
            ))),
        }
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> ModalAction {
        match &mut self.content {
            ModalContent::Form(form) => form.handle_key(key, modifiers),
            ModalContent::Message(_) => self
                .actions
                .iter()
                .find(|action| action.key == key)
                .map(|action| action.result.clone())
                .unwrap_or(ModalAction::Continue),
        }
    }

    /// Rows the content needs, borders and footer included.
    fn min_height(&self) -> u16 {
        let content_rows = match &self.content {
            ModalContent::Message(_) => 3,
            ModalContent::Form(form) => u16::try_from(form.fields.len())
                .unwrap_or(u16::MAX)
                .saturating_mul(2)
                .saturating_add(1),
        };
        content_rows.saturating_add(4)
    }

    /// Calculate the dialog area within the given frame area.
    pub fn area(&self, frame_area: Rect) -> Rect {
        let width = (frame_area.width as u32 * self.size.width_percent as u32 / 100) as u16;
        let height = (frame_area.height as u32 * self.size.height_percent as u32 / 100) as u16;
        let height = height.max(self.min_height()).min(frame_area.height);
        let x = frame_area.x + (frame_area.width.saturating_sub(width)) / 2;
        let y = frame_area.y + (frame_area.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }

    /// Render the dialog to the frame.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &ThemeConfig, cursor_visible: bool) {
        let dialog_area = self.area(area);

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(theme.title()).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.background()));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        match &self.content {
            ModalContent::Message(message) => {
                let paragraph = Paragraph::new(message.as_str())
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(theme.text()));
                frame.render_widget(paragraph, chunks[0]);
            }
            ModalContent::Form(form) => {
                frame.render_widget(
                    Paragraph::new(form_lines(form, theme, cursor_visible)),
                    chunks[0],
                );
            }
        }

        let hints: Vec<Span> = self
            .actions
            .iter()
            .flat_map(|action| {
                vec![
                    Span::styled(
                        format!("[{}]", action.key_name()),
                        Style::default().fg(theme.hint()),
                    ),
                    Span::raw(format!(" {}  ", action.label)),
                ]
            })
            .collect();
        let hints_paragraph =
            Paragraph::new(Line::from(hints)).style(Style::default().fg(theme.label()));
        frame.render_widget(hints_paragraph, chunks[1]);
    }
}

fn form_lines(form: &PromptForm, theme: &ThemeConfig, cursor_visible: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(form.fields.len() * 2 + 1);

    for (index, field) in form.fields.iter().enumerate() {
        let focused = index == form.focused();
        let marker = if field.descriptor.required { " *" } else { "" };
        lines.push(Line::from(Span::styled(
            format!("{}{}", field.descriptor.label, marker),
            Style::default().fg(theme.label()),
        )));

        let input_style = if focused {
            Style::default().fg(theme.text()).bg(theme.focused_input_bg())
        } else {
            Style::default().fg(theme.text())
        };

        let display = field.display();
        let mut spans = vec![Span::styled("> ", Style::default().fg(theme.border()))];
        if display.is_empty() && !focused {
            if let Some(placeholder) = &field.descriptor.placeholder {
                spans.push(Span::styled(
                    placeholder.clone(),
                    Style::default().fg(theme.label()).add_modifier(Modifier::ITALIC),
                ));
            }
        } else if focused {
            let split: usize = display
                .char_indices()
                .nth(field.cursor())
                .map(|(i, _)| i)
                .unwrap_or(display.len());
            let cursor_char = if cursor_visible { "▎" } else { " " };
            spans.push(Span::styled(display[..split].to_string(), input_style));
            spans.push(Span::styled(cursor_char, Style::default().fg(theme.border())));
            spans.push(Span::styled(display[split..].to_string(), input_style));
        } else {
            spans.push(Span::styled(display, input_style));
        }
        lines.push(Line::from(spans));
    }

    if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error()),
        )));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Bindings, DialogSize};
    use serde_json::json;

    fn small() -> SizeProfile {
        SizeProfile::new(40, 30)
    }

    #[test]
    fn test_confirm_keys() {
        let mut dialog = ModalDialog::confirm(DialogId(1), "Delete?", "Sure?", small());
        assert_eq!(
            dialog.handle_key(KeyCode::Char('x'), KeyModifiers::NONE),
            ModalAction::Continue
        );
        assert_eq!(
            dialog.handle_key(KeyCode::Char('y'), KeyModifiers::NONE),
            ModalAction::Submit(json!(true))
        );
        assert_eq!(
            dialog.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalAction::Submit(json!(true))
        );
        assert_eq!(dialog.handle_key(KeyCode::Char('n'), KeyModifiers::NONE), ModalAction::Dismiss);
        assert_eq!(dialog.handle_key(KeyCode::Esc, KeyModifiers::NONE), ModalAction::Dismiss);
    }

    #[test]
    fn test_prompt_keys_go_to_form() {
        let mut dialog = ModalDialog::prompt(
            DialogId(2),
            "Rename",
            vec![FieldDescriptor::new("newName", "New name")],
            small(),
        );
        // 'y' is text here, not a confirmation
        assert_eq!(
            dialog.handle_key(KeyCode::Char('y'), KeyModifiers::NONE),
            ModalAction::Continue
        );
        assert_eq!(
            dialog.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            ModalAction::Submit(json!({"newName": "y"}))
        );
    }

    #[test]
    fn test_from_descriptor_confirm() {
        let descriptor = DialogDescriptor {
            id: DialogId(4),
            template: TemplateRef::CONFIRM,
            size: DialogSize::Small,
            bindings: Bindings::new()
                .bind("title", || json!("Delete?"))
                .bind("message", || json!("This cannot be undone")),
            controller: Controller::Confirm,
        };
        let dialog = ModalDialog::from_descriptor(&descriptor, &ProfileConfig::default()).unwrap();
        assert_eq!(dialog.id, DialogId(4));
        assert_eq!(dialog.title, "Delete?");
        assert_eq!(dialog.size, ProfileConfig::default().small);
        assert!(matches!(
            dialog.content,
            ModalContent::Message(ref m) if m == "This cannot be undone"
        ));
    }

    #[test]
    fn test_from_descriptor_mismatched_template() {
        let descriptor = DialogDescriptor {
            id: DialogId(5),
            template: TemplateRef::new("wizard"),
            size: DialogSize::Large,
            bindings: Bindings::new(),
            controller: Controller::Prompt,
        };
        let err = ModalDialog::from_descriptor(&descriptor, &ProfileConfig::default()).unwrap_err();
        assert_eq!(
            err,
            DialogError::HostUnavailable(
                "no view for template 'wizard' with Prompt controller".into()
            )
        );
    }

    #[test]
    fn test_from_descriptor_missing_binding() {
        let descriptor = DialogDescriptor {
            id: DialogId(6),
            template: TemplateRef::PROMPT,
            size: DialogSize::Small,
            bindings: Bindings::new().bind("title", || json!("Rename")),
            controller: Controller::Prompt,
        };
        let err = ModalDialog::from_descriptor(&descriptor, &ProfileConfig::default()).unwrap_err();
        assert_eq!(err, DialogError::HostUnavailable("missing binding 'fields'".into()));
    }

    #[test]
    fn test_area_is_centered_and_fits_content() {
        let dialog = ModalDialog::confirm(DialogId(1), "T", "M", SizeProfile::new(50, 50));
        let area = dialog.area(Rect::new(0, 0, 100, 40));
        assert_eq!(area, Rect::new(25, 10, 50, 20));

        // Too short for its content: grows to the minimum height
        let dialog = ModalDialog::confirm(DialogId(1), "T", "M", SizeProfile::new(50, 10));
        let area = dialog.area(Rect::new(0, 0, 100, 40));
        assert_eq!(area.height, 7);
    }

    #[test]
    fn test_min_height_saturates_for_huge_forms() {
        let fields = (0..40_000)
            .map(|i| FieldDescriptor::new(format!("f{}", i), "F"))
            .collect();
        let dialog = ModalDialog::prompt(DialogId(1), "Many", fields, small());
        assert_eq!(dialog.min_height(), u16::MAX);

        let frame = Rect::new(0, 0, 100, 40);
        assert_eq!(dialog.area(frame).height, 40);
    }
}
