//! Dialog service: the entry point application code uses to ask the user
//! something.
//!
//! ```ignore
//! use tui_dialogs::{DialogService, FieldDescriptor};
//!
//! async fn rename(service: &DialogService) -> anyhow::Result<()> {
//!     service.confirm("Delete?", "This cannot be undone").await?;
//!
//!     let values = service
//!         .prompt("Rename", vec![FieldDescriptor::new("newName", "New name")])
//!         .await?;
//!     println!("{}", values["newName"]);
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use futures::future::FusedFuture;
use serde_json::Value;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::DialogError;
use crate::field::{FieldDescriptor, FieldValues};
use crate::host::{
    Bindings, Controller, DialogDescriptor, DialogId, DialogSize, ModalHost, Outcome,
    PendingOutcome, TemplateRef,
};

/// The two kinds of dialog the service can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Confirm,
    Prompt,
}

impl DialogKind {
    pub const fn name(&self) -> &'static str {
        match self {
            DialogKind::Confirm => "confirm",
            DialogKind::Prompt => "prompt",
        }
    }
}

/// A single, immutable request for user input.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogRequest {
    Confirm { title: String, message: String },
    Prompt { title: String, fields: Vec<FieldDescriptor> },
}

impl DialogRequest {
    pub fn kind(&self) -> DialogKind {
        match self {
            DialogRequest::Confirm { .. } => DialogKind::Confirm,
            DialogRequest::Prompt { .. } => DialogKind::Prompt,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            DialogRequest::Confirm { title, .. } | DialogRequest::Prompt { title, .. } => title,
        }
    }

    /// Check the caller contract before anything reaches the host.
    pub fn validate(&self) -> Result<(), DialogError> {
        if self.title().trim().is_empty() {
            return Err(DialogError::InvalidInput("title must not be empty".to_string()));
        }

        if let DialogRequest::Prompt { fields, .. } = self {
            if fields.is_empty() {
                return Err(DialogError::InvalidInput(
                    "prompt needs at least one field".to_string(),
                ));
            }
            let mut seen = HashSet::new();
            for field in fields {
                if field.name.is_empty() {
                    return Err(DialogError::InvalidInput(
                        "field name must not be empty".to_string(),
                    ));
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(DialogError::InvalidInput(format!(
                        "duplicate field name '{}'",
                        field.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Build the descriptor handed to the modal host.
    ///
    /// Each kind has a fixed presentation profile: template, size and
    /// controller never vary between calls.
    pub fn into_descriptor(self, id: DialogId) -> DialogDescriptor {
        match self {
            DialogRequest::Confirm { title, message } => {
                let title: Arc<str> = title.into();
                let message: Arc<str> = message.into();
                DialogDescriptor {
                    id,
                    template: TemplateRef::CONFIRM,
                    size: DialogSize::Small,
                    bindings: Bindings::new()
                        .bind("title", move || Value::from(&*title))
                        .bind("message", move || Value::from(&*message)),
                    controller: Controller::Confirm,
                }
            }
            DialogRequest::Prompt { title, fields } => {
                let title: Arc<str> = title.into();
                let fields: Arc<[FieldDescriptor]> = fields.into();
                DialogDescriptor {
                    id,
                    template: TemplateRef::PROMPT,
                    size: DialogSize::Small,
                    bindings: Bindings::new()
                        .bind("title", move || Value::from(&*title))
                        .bind("fields", move || {
                            serde_json::to_value(&*fields).unwrap_or(Value::Null)
                        }),
                    controller: Controller::Prompt,
                }
            }
        }
    }
}

type Adapter<T> = Box<dyn FnOnce(Value) -> Result<T, DialogError> + Send>;

enum Settlement {
    Pending(PendingOutcome),
    Rejected(DialogError),
    Done,
}

/// Future of a single dialog's outcome.
///
/// Resolves once: with the dialog's value, or with a [`DialogError`]
/// ([`DialogError::Cancelled`] when the user dismissed it). Polling again
/// after completion panics, like any other future.
#[must_use = "a dialog outcome is only observable through its handle"]
pub struct DialogHandle<T> {
    id: DialogId,
    kind: DialogKind,
    state: Settlement,
    adapt: Option<Adapter<T>>,
}

impl<T> DialogHandle<T> {
    fn pending(
        id: DialogId,
        kind: DialogKind,
        pending: PendingOutcome,
        adapt: Adapter<T>,
    ) -> Self {
        Self {
            id,
            kind,
            state: Settlement::Pending(pending),
            adapt: Some(adapt),
        }
    }

    fn rejected(id: DialogId, kind: DialogKind, err: DialogError) -> Self {
        Self {
            id,
            kind,
            state: Settlement::Rejected(err),
            adapt: None,
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    /// Take the outcome if the dialog has settled, without waiting.
    ///
    /// Returns `None` while the user has not acted yet, and after the
    /// outcome has already been taken.
    pub fn try_result(&mut self) -> Option<Result<T, DialogError>> {
        let received = match &mut self.state {
            Settlement::Pending(pending) => match pending.rx.try_recv() {
                Ok(outcome) => Ok(outcome),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Closed) => Err(DialogError::Abandoned),
            },
            Settlement::Rejected(_) => match std::mem::replace(&mut self.state, Settlement::Done) {
                Settlement::Rejected(err) => return Some(Err(err)),
                _ => return None,
            },
            Settlement::Done => return None,
        };
        self.state = Settlement::Done;
        Some(self.finish(received))
    }

    fn finish(&mut self, received: Result<Outcome, DialogError>) -> Result<T, DialogError> {
        let result = match received {
            Ok(Outcome::Submitted(value)) => match self.adapt.take() {
                Some(adapt) => adapt(value),
                None => Err(DialogError::MalformedOutcome("outcome adapted twice".to_string())),
            },
            Ok(Outcome::Dismissed) => Err(DialogError::Cancelled),
            Ok(Outcome::Failed(reason)) => Err(DialogError::Controller(reason)),
            Err(err) => Err(err),
        };
        match &result {
            Ok(_) => {
                tracing::debug!(dialog = %self.id, kind = self.kind.name(), "dialog resolved")
            }
            Err(err) => tracing::debug!(
                dialog = %self.id,
                kind = self.kind.name(),
                error = %err,
                "dialog rejected"
            ),
        }
        result
    }
}

impl<T> std::fmt::Debug for DialogHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            Settlement::Pending(_) => "pending",
            Settlement::Rejected(_) => "rejected",
            Settlement::Done => "done",
        };
        f.debug_struct("DialogHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &state)
            .finish()
    }
}

impl<T> Future for DialogHandle<T> {
    type Output = Result<T, DialogError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let received = match &mut this.state {
            Settlement::Pending(pending) => {
                ready!(Pin::new(&mut pending.rx).poll(cx)).map_err(|_| DialogError::Abandoned)
            }
            Settlement::Rejected(_) => match std::mem::replace(&mut this.state, Settlement::Done) {
                Settlement::Rejected(err) => return Poll::Ready(Err(err)),
                _ => unreachable!("state checked above"),
            },
            Settlement::Done => panic!("DialogHandle polled after completion"),
        };
        this.state = Settlement::Done;
        Poll::Ready(this.finish(received))
    }
}

impl<T> FusedFuture for DialogHandle<T> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, Settlement::Done)
    }
}

/// Source of dialog ids, shared by every service in the process so that
/// services presenting to the same host never reuse an id.
static NEXT_DIALOG_ID: AtomicU64 = AtomicU64::new(1);

fn next_dialog_id() -> DialogId {
    DialogId(NEXT_DIALOG_ID.fetch_add(1, Ordering::Relaxed))
}

/// Asks a [`ModalHost`] for confirmations and prompts.
///
/// Every call is independent: the service keeps no record of open dialogs
/// and imposes no ordering between them. Stacking is the host's business.
#[derive(Clone)]
pub struct DialogService {
    host: Arc<dyn ModalHost>,
}

impl DialogService {
    pub fn new(host: Arc<dyn ModalHost>) -> Self {
        Self { host }
    }

    /// Ask the user to confirm something.
    ///
    /// Resolves with `()` on confirmation and rejects with
    /// [`DialogError::Cancelled`] on dismissal, including a host that
    /// submits `false`.
    pub fn confirm(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> DialogHandle<()> {
        let request = DialogRequest::Confirm {
            title: title.into(),
            message: message.into(),
        };
        self.open(request, Box::new(confirmation))
    }

    /// Ask the user to fill in a set of fields.
    ///
    /// Resolves with one value per field, keyed by field name.
    pub fn prompt(
        &self,
        title: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> DialogHandle<FieldValues> {
        let names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
        let request = DialogRequest::Prompt {
            title: title.into(),
            fields,
        };
        self.open(request, Box::new(move |value| collect_field_values(&names, value)))
    }

    fn open<T>(&self, request: DialogRequest, adapt: Adapter<T>) -> DialogHandle<T> {
        let id = next_dialog_id();
        let kind = request.kind();

        if let Err(err) = request.validate() {
            tracing::warn!(
                dialog = %id,
                kind = kind.name(),
                error = %err,
                "rejecting dialog request"
            );
            return DialogHandle::rejected(id, kind, err);
        }

        tracing::debug!(
            dialog = %id,
            kind = kind.name(),
            title = request.title(),
            "presenting dialog"
        );
        match self.host.present(request.into_descriptor(id)) {
            Ok(pending) => DialogHandle::pending(id, kind, pending, adapt),
            Err(err) => {
                tracing::warn!(
                    dialog = %id,
                    kind = kind.name(),
                    error = %err,
                    "modal host refused dialog"
                );
                DialogHandle::rejected(id, kind, err)
            }
        }
    }
}

impl std::fmt::Debug for DialogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogService").finish_non_exhaustive()
    }
}

/// Read a confirmation: `true` (or no value) accepts, `false` declines.
fn confirmation(value: Value) -> Result<(), DialogError> {
    match value {
        Value::Bool(true) | Value::Null => Ok(()),
        Value::Bool(false) => Err(DialogError::Cancelled),
        other => Err(DialogError::MalformedOutcome(format!(
            "confirm submitted {} instead of a boolean",
            json_type_name(&other)
        ))),
    }
}

/// Keep exactly the declared fields from a submitted object.
fn collect_field_values(names: &[String], value: Value) -> Result<FieldValues, DialogError> {
    let mut submitted = match value {
        Value::Object(map) => map,
        other => {
            return Err(DialogError::MalformedOutcome(format!(
                "prompt submitted {} instead of an object",
                json_type_name(&other)
            )))
        }
    };

    names
        .iter()
        .map(|name| {
            submitted
                .remove(name)
                .map(|v| (name.clone(), v))
                .ok_or_else(|| {
                    DialogError::MalformedOutcome(format!(
                        "no value submitted for field '{}'",
                        name
                    ))
                })
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
