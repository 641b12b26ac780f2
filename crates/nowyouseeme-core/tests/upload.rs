//! Upload pipeline integration tests.

use nowyouseeme_client::ClientError;
use nowyouseeme_core::{
    ChangeNotifier, Gallery, RefreshFlag, UploadError, UploadForm, load, submit,
};
use nowyouseeme_protocol::{decode_payload, display_data_uri, strip_data_uri_prefix};
use nowyouseeme_test_utils::{ApiCall, PNG_1X1, RecordingApi, StubApi, write_png};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::tempdir;

#[derive(Default)]
struct CountingNotifier {
    count: Mutex<usize>,
}

impl ChangeNotifier for CountingNotifier {
    fn notify_changed(&self) {
        *self.count.lock() += 1;
    }
}

fn form_for(file: PathBuf) -> UploadForm {
    let mut form = UploadForm::new();
    form.agent_name = "Bot1".to_string();
    form.description = "a quiet spiral".to_string();
    form.file = Some(file);
    form
}

/// Validation failures never reach the transfer client.
#[tokio::test]
async fn invalid_form_does_not_call_client() {
    let (api, calls) = RecordingApi::new(StubApi::default());
    let notifier = CountingNotifier::default();

    let mut form = UploadForm::new();
    form.file = Some(PathBuf::from("portrait.png"));
    let err = submit(&mut form, &api, &notifier).await.unwrap_err();
    assert!(matches!(err, UploadError::Validation(_)));
    assert!(form.error().is_some());

    let mut form = UploadForm::new();
    form.agent_name = "Bot1".to_string();
    let err = submit(&mut form, &api, &notifier).await.unwrap_err();
    assert!(matches!(err, UploadError::Validation(_)));

    assert!(calls.lock().is_empty());
    assert_eq!(*notifier.count.lock(), 0);
}

#[tokio::test]
async fn encoded_payload_reproduces_png_bytes() {
    let temp = tempdir().expect("tempdir");
    let mut form = form_for(write_png(temp.path()));

    let job = form.begin_submit().expect("job");
    let payload = job.encode().await.expect("encode");
    assert!(!payload.starts_with("data:"));

    let rebuilt = display_data_uri(&payload);
    let bytes = decode_payload(strip_data_uri_prefix(&rebuilt).expect("prefix")).expect("decode");
    assert_eq!(bytes, PNG_1X1);
}

#[tokio::test]
async fn successful_upload_triggers_exactly_one_refresh() {
    let temp = tempdir().expect("tempdir");
    let (api, calls) = RecordingApi::new(StubApi::default());
    let flag = RefreshFlag::new();
    let mut gallery = Gallery::new();

    let mut form = form_for(write_png(temp.path()));
    let created = submit(&mut form, &api, &flag).await.expect("upload");
    assert_eq!(created.agent_name, "Bot1");
    assert_eq!(created.description.as_deref(), Some("a quiet spiral"));
    assert_eq!(form, UploadForm::default());

    if flag.take() {
        load(&api, &mut gallery).await;
    }
    assert!(!flag.take());

    let calls = calls.lock().clone();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], ApiCall::Create(request) if request.agent_name == "Bot1"));
    assert_eq!(calls[1], ApiCall::List);
    assert_eq!(gallery.visualizations()[0].id, created.id);
}

#[tokio::test]
async fn rejected_create_keeps_form_for_retry() {
    let temp = tempdir().expect("tempdir");
    let api = StubApi::default().with_create_error(ClientError::Validation(
        "image_data is required".to_string(),
    ));
    let notifier = CountingNotifier::default();

    let mut form = form_for(write_png(temp.path()));
    let err = submit(&mut form, &api, &notifier).await.unwrap_err();
    assert_eq!(
        err,
        UploadError::Client(ClientError::Validation("image_data is required".to_string()))
    );
    assert_eq!(form.agent_name, "Bot1");
    assert_eq!(form.description, "a quiet spiral");
    assert!(form.file.is_some());
    assert!(!form.is_pending());
    assert_eq!(form.error(), Some("validation failed: image_data is required"));
    assert_eq!(*notifier.count.lock(), 0);
}

#[tokio::test]
async fn unreadable_file_is_an_encoding_error() {
    let temp = tempdir().expect("tempdir");
    let (api, calls) = RecordingApi::new(StubApi::default());
    let notifier = CountingNotifier::default();

    let mut form = form_for(temp.path().join("missing.png"));
    let err = submit(&mut form, &api, &notifier).await.unwrap_err();
    assert!(matches!(err, UploadError::Encoding(_)));
    assert!(calls.lock().is_empty());
    assert!(form.error().is_some_and(|message| message.starts_with("encoding failed")));
}

#[tokio::test]
async fn tags_and_mood_travel_with_the_request() {
    let temp = tempdir().expect("tempdir");
    let (api, calls) = RecordingApi::new(StubApi::default());
    let mut form = form_for(write_png(temp.path()));
    form.tags = vec!["spiral".to_string()];
    form.current_mood = Some("serene".to_string());

    let created = submit(&mut form, &api, &RefreshFlag::new())
        .await
        .expect("upload");
    assert_eq!(created.expression.tags, Some(vec!["spiral".to_string()]));
    assert_eq!(created.state.current_mood.as_deref(), Some("serene"));
    assert_eq!(calls.lock().len(), 1);
}
