//! Terminal presentation of dialogs.
//!
//! This module contains the ratatui side of the crate:
//! - Modal dialog views and their key handling
//! - Prompt form input state
//! - The stacked terminal modal host

pub mod form;
pub mod modal;
mod terminal_host;

pub use form::{FieldInput, PromptForm};
pub use modal::{DialogAction, ModalAction, ModalContent, ModalDialog};
pub use terminal_host::TerminalHost;
