//! Upload pipeline: validate the form, encode the file, submit it.
//!
//! A submission is split in two so that front ends can run the slow part off
//! their event loop: [`UploadForm::begin_submit`] validates and marks the form
//! pending, [`UploadJob::run`] does the file read, encoding and `create` call,
//! and [`UploadForm::finish`] records the outcome.

use crate::{ChangeNotifier, UploadError};
use log::{debug, info, warn};
use nowyouseeme_client::VisualizationApi;
use nowyouseeme_protocol::{
    CreateVisualizationRequest, DISPLAY_MIME, Visualization, encode_data_uri, sniff_mime,
    strip_data_uri_prefix,
};
use std::path::PathBuf;

/// Editable upload form plus its submission state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub agent_name: String,
    /// May be left empty.
    pub description: String,
    pub file: Option<PathBuf>,
    /// Extra tags attached to the request; empty means none.
    pub tags: Vec<String>,
    pub current_mood: Option<String>,
    pending: bool,
    error: Option<String>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Message from the last failed submission, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check the fields required before anything leaves the form.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.agent_name.trim().is_empty() {
            return Err(UploadError::Validation("agent name is required".to_string()));
        }
        if self.file.is_none() {
            return Err(UploadError::Validation(
                "select an image file to upload".to_string(),
            ));
        }
        Ok(())
    }

    /// Start a submission.
    ///
    /// Fails without side effects while another submission is pending. A
    /// validation failure is recorded on the form.
    pub fn begin_submit(&mut self) -> Result<UploadJob, UploadError> {
        if self.pending {
            debug!("upload rejected: submission already in flight");
            return Err(UploadError::InFlight);
        }
        if let Err(err) = self.validate() {
            self.error = Some(err.to_string());
            return Err(err);
        }
        let Some(file) = self.file.clone() else {
            return Err(UploadError::Validation(
                "select an image file to upload".to_string(),
            ));
        };

        self.pending = true;
        self.error = None;
        let description = self.description.trim();
        Ok(UploadJob {
            agent_name: self.agent_name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            file,
            tags: self.tags.clone(),
            current_mood: self.current_mood.clone(),
        })
    }

    /// Record the outcome of the job returned by [`UploadForm::begin_submit`].
    ///
    /// Success clears the form; failure keeps every field for a retry.
    pub fn finish(&mut self, result: &Result<Visualization, UploadError>) {
        self.pending = false;
        match result {
            Ok(_) => *self = Self::default(),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// [`UploadForm::finish`], then tell `notifier` when the upload succeeded.
    ///
    /// The notification is sent after the form has been reset.
    pub fn settle(
        &mut self,
        result: &Result<Visualization, UploadError>,
        notifier: &dyn ChangeNotifier,
    ) {
        self.finish(result);
        if result.is_ok() {
            notifier.notify_changed();
        }
    }
}

/// Snapshot of a validated form, ready to encode and send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    agent_name: String,
    description: Option<String>,
    file: PathBuf,
    tags: Vec<String>,
    current_mood: Option<String>,
}

impl UploadJob {
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn file(&self) -> &PathBuf {
        &self.file
    }

    /// Read the file and turn it into a bare base64 payload.
    pub async fn encode(&self) -> Result<String, UploadError> {
        let bytes = tokio::fs::read(&self.file).await.map_err(|err| {
            UploadError::Encoding(format!("failed to read {}: {err}", self.file.display()))
        })?;
        let mime = sniff_mime(&bytes);
        if mime != DISPLAY_MIME {
            warn!(
                "uploading non-png image; gallery will still render it as png (path={}, mime={})",
                self.file.display(),
                mime
            );
        }

        let data_uri = tokio::task::spawn_blocking(move || encode_data_uri(&bytes))
            .await
            .map_err(|err| UploadError::Encoding(err.to_string()))?;
        let payload = strip_data_uri_prefix(&data_uri)
            .map_err(|err| UploadError::Encoding(err.to_string()))?;
        debug!(
            "encoded upload payload (path={}, payload_len={})",
            self.file.display(),
            payload.len()
        );
        Ok(payload.to_string())
    }

    /// Build the create request around an encoded payload.
    pub fn request(&self, image_data: String) -> CreateVisualizationRequest {
        let mut request = CreateVisualizationRequest::new(
            self.agent_name.clone(),
            self.description.clone(),
            image_data,
        );
        if !self.tags.is_empty() {
            request.expression.tags = Some(self.tags.clone());
        }
        request.state.current_mood = self.current_mood.clone();
        request
    }

    /// Encode the file and publish it.
    pub async fn run(self, api: &dyn VisualizationApi) -> Result<Visualization, UploadError> {
        let payload = self.encode().await?;
        let request = self.request(payload);
        let created = api.create(&request).await?;
        info!(
            "upload complete (id={}, agent_name={})",
            created.id, created.agent_name
        );
        Ok(created)
    }
}

/// Run one full submission for `form`, notifying on success only.
pub async fn submit(
    form: &mut UploadForm,
    api: &dyn VisualizationApi,
    notifier: &dyn ChangeNotifier,
) -> Result<Visualization, UploadError> {
    let job = form.begin_submit()?;
    let result = job.run(api).await;
    form.settle(&result, notifier);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_form() -> UploadForm {
        UploadForm {
            agent_name: "  Bot1 ".to_string(),
            description: "   ".to_string(),
            file: Some(PathBuf::from("portrait.png")),
            ..UploadForm::default()
        }
    }

    #[test]
    fn blank_agent_name_is_rejected_and_recorded() {
        let mut form = filled_form();
        form.agent_name = "   ".to_string();
        let err = form.begin_submit().unwrap_err();
        assert!(matches!(err, UploadError::Validation(_)));
        assert_eq!(form.error(), Some("agent name is required"));
        assert!(!form.is_pending());
    }

    #[test]
    fn missing_file_is_rejected() {
        let mut form = filled_form();
        form.file = None;
        assert!(matches!(
            form.begin_submit(),
            Err(UploadError::Validation(_))
        ));
    }

    #[test]
    fn second_submission_while_pending_is_rejected() {
        let mut form = filled_form();
        let job = form.begin_submit().expect("job");
        assert_eq!(job.agent_name(), "Bot1");
        assert!(form.is_pending());
        assert_eq!(form.begin_submit().unwrap_err(), UploadError::InFlight);
    }

    #[test]
    fn blank_description_is_omitted_from_request() {
        let mut form = filled_form();
        form.tags = vec!["calm".to_string()];
        let request = form.begin_submit().expect("job").request("aGk=".to_string());
        assert_eq!(request.agent_name, "Bot1");
        assert_eq!(request.description, None);
        assert_eq!(request.image_data, "aGk=");
        assert_eq!(request.expression.tags, Some(vec!["calm".to_string()]));
        assert_eq!(request.state.current_mood, None);
    }

    #[test]
    fn failure_keeps_fields_and_success_clears_them() {
        let mut form = filled_form();
        form.begin_submit().expect("job");
        form.finish(&Err(UploadError::Encoding("disk gone".to_string())));
        assert!(!form.is_pending());
        assert_eq!(form.error(), Some("encoding failed: disk gone"));
        assert_eq!(form.agent_name, "  Bot1 ");
        assert!(form.file.is_some());

        form.begin_submit().expect("retry");
        assert_eq!(form.error(), None);
    }

    #[test]
    fn settle_notifies_only_after_success() {
        let refresh = crate::RefreshFlag::new();
        let mut form = filled_form();

        form.begin_submit().expect("job");
        form.settle(&Err(UploadError::Encoding("disk gone".to_string())), &refresh);
        assert!(!refresh.take());

        form.begin_submit().expect("retry");
        let created = Visualization {
            id: "new-1".to_string(),
            agent_name: "Bot1".to_string(),
            description: None,
            image_data: "aGk=".to_string(),
            created_at: nowyouseeme_protocol::Timestamp::new("2024-01-01"),
            updated_at: None,
            expression: Default::default(),
            state: Default::default(),
            capabilities: Default::default(),
            context: Default::default(),
        };
        form.settle(&Ok(created), &refresh);
        assert!(refresh.take());
        assert_eq!(form, UploadForm::default());
    }
}
