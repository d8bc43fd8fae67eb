//! Errors surfaced through a [`DialogHandle`](crate::service::DialogHandle).

use thiserror::Error;

/// Reasons a dialog handle settles without a value.
///
/// User dismissal is kept apart from genuine failures so callers can branch
/// on [`DialogError::is_cancelled`] instead of treating every rejection alike.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DialogError {
    /// The user closed the dialog without confirming or submitting.
    #[error("dialog dismissed by user")]
    Cancelled,

    /// The modal host could not present the dialog.
    #[error("modal host unavailable: {0}")]
    HostUnavailable(String),

    /// The request broke the caller contract (empty title, duplicate field, ...).
    #[error("invalid dialog request: {0}")]
    InvalidInput(String),

    /// The host's controller settled the dialog with a failure.
    #[error("dialog controller failed: {0}")]
    Controller(String),

    /// The host submitted a value that does not fit the requested result.
    #[error("malformed dialog outcome: {0}")]
    MalformedOutcome(String),

    /// The host dropped the dialog without ever settling it.
    #[error("dialog was closed without an outcome")]
    Abandoned,
}

impl DialogError {
    /// Whether this rejection is a user dismissal rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
