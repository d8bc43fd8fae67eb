//! A [`ModalHost`] that draws dialogs on a ratatui terminal.
//!
//! Presented dialogs are kept on a stack. The most recent one is drawn on top
//! and receives all key events; older ones stay visible underneath until the
//! top dialog is settled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{layout::Rect, Frame};

use crate::config::{ProfileConfig, ThemeConfig};
use crate::error::DialogError;
use crate::host::{outcome_channel, DialogDescriptor, DialogId, ModalHost, PendingOutcome, Settle};

use super::modal::{ModalAction, ModalDialog};

struct ActiveModal {
    dialog: ModalDialog,
    settle: Settle,
}

#[derive(Default)]
struct ModalStack {
    modals: Vec<ActiveModal>,
}

/// Terminal-backed modal host. Cheap to clone; clones share one stack.
#[derive(Clone)]
pub struct TerminalHost {
    stack: Arc<Mutex<ModalStack>>,
    profiles: ProfileConfig,
}

impl TerminalHost {
    pub fn new(profiles: ProfileConfig) -> Self {
        Self {
            stack: Arc::new(Mutex::new(ModalStack::default())),
            profiles,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModalStack> {
        // A panic while holding the lock cannot leave the stack half-updated.
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if any dialog is waiting for the user.
    pub fn has_active(&self) -> bool {
        !self.lock().modals.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.lock().modals.len()
    }

    /// Id of the dialog that currently receives input.
    pub fn top(&self) -> Option<DialogId> {
        self.lock().modals.last().map(|m| m.dialog.id)
    }

    /// Route a key to the top dialog, settling it if the key closes it.
    ///
    /// Returns the id of the dialog that was settled, if any.
    pub fn handle_key(&self, key: KeyCode, modifiers: KeyModifiers) -> Option<DialogId> {
        let mut stack = self.lock();
        let action = stack.modals.last_mut()?.dialog.handle_key(key, modifiers);

        match action {
            ModalAction::Continue => None,
            ModalAction::Submit(value) => {
                let modal = stack.modals.pop()?;
                let id = modal.dialog.id;
                tracing::info!(dialog = %id, "dialog submitted");
                modal.settle.submit(value);
                Some(id)
            }
            ModalAction::Dismiss => {
                let modal = stack.modals.pop()?;
                let id = modal.dialog.id;
                tracing::info!(dialog = %id, "dialog dismissed");
                modal.settle.dismiss();
                Some(id)
            }
        }
    }

    /// Dismiss every open dialog, top first.
    pub fn dismiss_all(&self) -> usize {
        let mut stack = self.lock();
        let count = stack.modals.len();
        while let Some(modal) = stack.modals.pop() {
            tracing::info!(dialog = %modal.dialog.id, "dialog dismissed");
            modal.settle.dismiss();
        }
        count
    }

    /// Draw all open dialogs, bottom of the stack first.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &ThemeConfig, cursor_visible: bool) {
        let stack = self.lock();
        let top = stack.modals.len().saturating_sub(1);
        for (index, modal) in stack.modals.iter().enumerate() {
            modal.dialog.render(frame, area, theme, cursor_visible && index == top);
        }
    }
}

impl ModalHost for TerminalHost {
    fn present(&self, descriptor: DialogDescriptor) -> Result<PendingOutcome, DialogError> {
        let dialog = ModalDialog::from_descriptor(&descriptor, &self.profiles)?;

        let mut stack = self.lock();
        if stack.modals.iter().any(|m| m.dialog.id == descriptor.id) {
            return Err(DialogError::HostUnavailable(format!(
                "dialog {} is already open",
                descriptor.id
            )));
        }

        let (settle, pending) = outcome_channel(descriptor.id);
        tracing::info!(
            dialog = %descriptor.id,
            template = %descriptor.template,
            depth = stack.modals.len() + 1,
            "dialog displayed"
        );
        stack.modals.push(ActiveModal { dialog, settle });
        Ok(pending)
    }
}

impl std::fmt::Debug for TerminalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalHost")
            .field("active", &self.active_count())
            .field("profiles", &self.profiles)
            .finish()
    }
}
