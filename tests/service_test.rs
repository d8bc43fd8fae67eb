//! Dialog service behavior against a scripted modal host.
//!
//! The scripted host accepts every dialog and keeps its settle token, so a
//! test plays the user by settling dialogs in whatever order it likes.

use std::sync::{Arc, Mutex};

use futures::future::FusedFuture;
use insta::assert_snapshot;
use serde_json::json;
use tui_dialogs::{
    outcome_channel, Controller, DialogDescriptor, DialogError, DialogId, DialogService,
    FieldDescriptor, FieldKind, ModalHost, PendingOutcome, Settle, TemplateRef,
};

#[derive(Default)]
struct ScriptedHost {
    open: Mutex<Vec<(DialogDescriptor, Settle)>>,
    refuse: Option<DialogError>,
}

impl ScriptedHost {
    fn refusing(err: DialogError) -> Self {
        Self {
            open: Mutex::default(),
            refuse: Some(err),
        }
    }

    fn open_count(&self) -> usize {
        self.open.lock().unwrap().len()
    }

    /// Take the dialog with the given id off the host.
    fn take(&self, id: DialogId) -> (DialogDescriptor, Settle) {
        let mut open = self.open.lock().unwrap();
        let index = open
            .iter()
            .position(|(d, _)| d.id == id)
            .expect("dialog is open");
        open.remove(index)
    }
}

impl ModalHost for ScriptedHost {
    fn present(&self, descriptor: DialogDescriptor) -> Result<PendingOutcome, DialogError> {
        if let Some(err) = &self.refuse {
            return Err(err.clone());
        }
        let (settle, pending) = outcome_channel(descriptor.id);
        self.open.lock().unwrap().push((descriptor, settle));
        Ok(pending)
    }
}

fn setup() -> (Arc<ScriptedHost>, DialogService) {
    let host = Arc::new(ScriptedHost::default());
    let service = DialogService::new(host.clone());
    (host, service)
}

fn rename_fields() -> Vec<FieldDescriptor> {
    vec![FieldDescriptor::new("newName", "New name")]
}

#[tokio::test]
async fn confirm_resolves_on_acceptance() {
    let (host, service) = setup();

    let handle = service.confirm("Delete?", "This cannot be undone");
    let (descriptor, settle) = host.take(handle.id());
    assert_eq!(descriptor.controller, Controller::Confirm);
    assert_eq!(descriptor.bindings.resolve("title"), Some(json!("Delete?")));

    settle.submit(json!(true));
    assert_eq!(handle.await, Ok(()));
}

#[tokio::test]
async fn prompt_resolves_with_field_values() {
    let (host, service) = setup();

    let handle = service.prompt("Rename", rename_fields());
    let (_, settle) = host.take(handle.id());
    settle.submit(json!({"newName": "report-final"}));

    let values = handle.await.unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values["newName"], json!("report-final"));
}

#[tokio::test]
async fn prompt_rejects_on_dismissal() {
    let (host, service) = setup();

    let handle = service.prompt("Rename", rename_fields());
    let (_, settle) = host.take(handle.id());
    settle.dismiss();

    let err = handle.await.unwrap_err();
    assert!(err.is_cancelled());
    assert_snapshot!(err.to_string(), @"dialog dismissed by user");
}

#[tokio::test]
async fn confirm_rejects_on_dismissal() {
    let (host, service) = setup();

    let handle = service.confirm("Delete?", "");
    let (_, settle) = host.take(handle.id());
    settle.dismiss();

    assert_eq!(handle.await, Err(DialogError::Cancelled));
}

#[tokio::test]
async fn confirm_declined_when_host_submits_false() {
    let (host, service) = setup();

    let handle = service.confirm("Delete?", "");
    let (_, settle) = host.take(handle.id());
    settle.submit(json!(false));

    assert_eq!(handle.await, Err(DialogError::Cancelled));
}

#[tokio::test]
async fn confirm_rejects_non_boolean_submission() {
    let (host, service) = setup();

    let handle = service.confirm("Delete?", "");
    let (_, settle) = host.take(handle.id());
    settle.submit(json!("yes"));

    assert_eq!(
        handle.await,
        Err(DialogError::MalformedOutcome(
            "confirm submitted a string instead of a boolean".to_string()
        ))
    );
}

#[tokio::test]
async fn prompt_keeps_one_value_per_field() {
    let (host, service) = setup();
    let fields = vec![
        FieldDescriptor::new("host", "Host").required(),
        FieldDescriptor::new("port", "Port").with_kind(FieldKind::Number),
        FieldDescriptor::new("token", "Token").with_kind(FieldKind::Password),
    ];

    let handle = service.prompt("Connect", fields.clone());
    let (descriptor, settle) = host.take(handle.id());

    // Fields reach the host verbatim and in order
    let forwarded: Vec<FieldDescriptor> = descriptor.bindings.get("fields").unwrap();
    assert_eq!(forwarded, fields);

    settle.submit(json!({"token": "s3cret", "host": "example.org", "port": 8089, "debug": true}));
    let values = handle.await.unwrap();
    let names: Vec<&str> = values.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["host", "port", "token"]);
    assert_eq!(values["port"], json!(8089));
}

#[tokio::test]
async fn handles_settle_independently() {
    let (host, service) = setup();

    let mut first = service.confirm("First?", "");
    let second = service.prompt("Second", rename_fields());
    assert_ne!(first.id(), second.id());
    assert_eq!(host.open_count(), 2);

    let (_, settle) = host.take(second.id());
    settle.submit(json!({"newName": "b"}));
    assert_eq!(second.await.unwrap()["newName"], json!("b"));

    // The first dialog is untouched by the second settling
    assert!(first.try_result().is_none());
    assert!(!first.is_terminated());

    let (_, settle) = host.take(first.id());
    settle.dismiss();
    assert_eq!(first.await, Err(DialogError::Cancelled));
}

#[tokio::test]
async fn handle_settles_exactly_once() {
    let (host, service) = setup();

    let mut handle = service.confirm("Delete?", "This cannot be undone");
    assert!(handle.try_result().is_none());

    let (_, settle) = host.take(handle.id());
    settle.submit(json!(true));

    assert_eq!(handle.try_result(), Some(Ok(())));
    assert!(handle.is_terminated());
    assert_eq!(handle.try_result(), None);
}

#[tokio::test]
async fn host_refusal_rejects_immediately() {
    let host = Arc::new(ScriptedHost::refusing(DialogError::HostUnavailable(
        "no terminal".to_string(),
    )));
    let service = DialogService::new(host.clone());

    let mut handle = service.confirm("Delete?", "");
    assert_eq!(
        handle.try_result(),
        Some(Err(DialogError::HostUnavailable("no terminal".to_string())))
    );

    let handle = service.prompt("Rename", rename_fields());
    let err = handle.await.unwrap_err();
    assert!(!err.is_cancelled());
}

#[tokio::test]
async fn invalid_requests_never_reach_the_host() {
    let (host, service) = setup();

    let empty = service.prompt("Rename", vec![]);
    let duplicate = service.prompt(
        "Rename",
        vec![FieldDescriptor::new("a", "A"), FieldDescriptor::new("a", "B")],
    );
    let untitled = service.confirm("", "message");

    assert_eq!(host.open_count(), 0);
    assert!(matches!(empty.await, Err(DialogError::InvalidInput(_))));
    assert!(matches!(duplicate.await, Err(DialogError::InvalidInput(_))));
    assert!(matches!(untitled.await, Err(DialogError::InvalidInput(_))));
}

#[tokio::test]
async fn dropped_dialog_is_abandoned() {
    let (host, service) = setup();

    let handle = service.prompt("Rename", rename_fields());
    let (_, settle) = host.take(handle.id());
    drop(settle);

    assert_eq!(handle.await.unwrap_err(), DialogError::Abandoned);
}

#[tokio::test]
async fn controller_failure_is_not_cancellation() {
    let (host, service) = setup();

    let handle = service.confirm("Delete?", "");
    let (_, settle) = host.take(handle.id());
    settle.fail("template failed to load");

    assert_eq!(
        handle.await,
        Err(DialogError::Controller("template failed to load".to_string()))
    );
}

#[tokio::test]
async fn malformed_prompt_submission_is_rejected() {
    let (host, service) = setup();

    let handle = service.prompt("Rename", rename_fields());
    let (_, settle) = host.take(handle.id());
    settle.submit(json!({"otherName": "x"}));

    assert_eq!(
        handle.await,
        Err(DialogError::MalformedOutcome(
            "no value submitted for field 'newName'".to_string()
        ))
    );
}

#[tokio::test]
async fn awaiting_waits_for_the_user() {
    let (host, service) = setup();

    let handle = service.confirm("Deploy?", "Ship to production");
    let id = handle.id();
    let waiter = tokio::spawn(handle);

    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());

    let (descriptor, settle) = host.take(id);
    assert_eq!(descriptor.template, TemplateRef::CONFIRM);
    settle.submit(json!(true));

    assert_eq!(waiter.await.unwrap(), Ok(()));
}
