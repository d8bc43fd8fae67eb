//! The boundary between the dialog service and whatever draws dialogs.
//!
//! A [`ModalHost`] receives an opaque [`DialogDescriptor`] and hands back a
//! [`PendingOutcome`]. The host keeps the matching [`Settle`] token and
//! consumes it exactly once when the user acts, so a dialog can never be
//! settled twice. Dropping the token without settling is observed by the
//! caller as [`DialogError::Abandoned`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::DialogError;

/// Identifier of one dialog request, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(pub u64);

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Name of the view a host should use to draw a dialog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateRef(Cow<'static, str>);

impl TemplateRef {
    /// View used for yes/no confirmations.
    pub const CONFIRM: TemplateRef = TemplateRef(Cow::Borrowed("confirm-dialog"));
    /// View used for field-entry prompts.
    pub const PROMPT: TemplateRef = TemplateRef(Cow::Borrowed("prompt-dialog"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Presentation size tag. Hosts map it to concrete dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// The unit responsible for producing a dialog's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    /// Settles with an affirmative value or a dismissal.
    Confirm,
    /// Settles with an object of field values or a dismissal.
    Prompt,
}

/// Lazily evaluated, read-only value handed to a host.
pub type Resolver = Arc<dyn Fn() -> Value + Send + Sync>;

/// Named bindings a host may read while building its view.
///
/// Values are produced on demand, so a host that never reads a binding
/// never pays for serializing it.
#[derive(Clone, Default)]
pub struct Bindings {
    entries: Vec<(&'static str, Resolver)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding. A later binding with the same name shadows an earlier one.
    pub fn bind<F>(mut self, name: &'static str, resolver: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, Arc::new(resolver)));
        self
    }

    /// Names of all bindings, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Evaluate a binding.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, resolver)| resolver())
    }

    /// Evaluate a binding and deserialize it.
    ///
    /// A missing or mistyped binding means the host cannot draw the dialog,
    /// so both surface as [`DialogError::HostUnavailable`].
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, DialogError> {
        let value = self
            .resolve(name)
            .ok_or_else(|| DialogError::HostUnavailable(format!("missing binding '{}'", name)))?;
        serde_json::from_value(value).map_err(|e| {
            DialogError::HostUnavailable(format!("binding '{}' has unexpected shape: {}", name, e))
        })
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Everything a host needs to present one dialog.
#[derive(Debug, Clone)]
pub struct DialogDescriptor {
    pub id: DialogId,
    pub template: TemplateRef,
    pub size: DialogSize,
    pub bindings: Bindings,
    pub controller: Controller,
}

/// How a host settled a dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The user completed the dialog.
    Submitted(Value),
    /// The user closed the dialog.
    Dismissed,
    /// The controller could not produce a result.
    Failed(String),
}

/// Host-side token that settles exactly one dialog.
#[derive(Debug)]
pub struct Settle {
    id: DialogId,
    tx: oneshot::Sender<Outcome>,
}

impl Settle {
    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn submit(self, value: Value) {
        self.settle(Outcome::Submitted(value));
    }

    pub fn dismiss(self) {
        self.settle(Outcome::Dismissed);
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.settle(Outcome::Failed(reason.into()));
    }

    pub fn settle(self, outcome: Outcome) {
        let Settle { id, tx } = self;
        if tx.send(outcome).is_err() {
            tracing::debug!(dialog = %id, "dialog settled after its handle was dropped");
        }
    }
}

/// Caller-side end of a presented dialog.
#[derive(Debug)]
pub struct PendingOutcome {
    pub(crate) rx: oneshot::Receiver<Outcome>,
}

/// Create the settlement pair for a dialog.
pub fn outcome_channel(id: DialogId) -> (Settle, PendingOutcome) {
    let (tx, rx) = oneshot::channel();
    (Settle { id, tx }, PendingOutcome { rx })
}

/// Something that can present dialogs to a user.
///
/// `present` must return as soon as the dialog is accepted for display; the
/// outcome arrives later through the returned [`PendingOutcome`].
pub trait ModalHost: Send + Sync {
    fn present(&self, descriptor: DialogDescriptor) -> Result<PendingOutcome, DialogError>;
}
