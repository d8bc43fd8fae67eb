//! tui-dialogs - confirmation and prompt dialogs behind a pluggable modal host.
//!
//! Application code talks to a [`DialogService`]; the service builds an
//! opaque [`DialogDescriptor`] and hands it to a [`ModalHost`]. The returned
//! [`DialogHandle`] settles exactly once with the user's answer, with
//! [`DialogError::Cancelled`] when the user dismisses the dialog, or with
//! another [`DialogError`] when the host fails.

pub mod cli;
pub mod config;
pub mod error;
pub mod field;
pub mod host;
pub mod input;
pub mod logging;
pub mod service;
pub mod ui;

pub use error::DialogError;
pub use field::{FieldDescriptor, FieldKind, FieldValues};
pub use host::{
    outcome_channel, Bindings, Controller, DialogDescriptor, DialogId, DialogSize, ModalHost,
    Outcome, PendingOutcome, Settle, TemplateRef,
};
pub use service::{DialogHandle, DialogKind, DialogRequest, DialogService};
