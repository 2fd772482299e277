use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

use log::*;
use reqwest::multipart;

use crate::{
    api::{ApiClient, COMPLAINT_EMAIL_PATH, SUPPORT_EMAIL_PATH},
    attachments,
    dto::requests::{ComplaintJsonDto, SupportJsonDto, SUPPORT_ENQUIRY_TYPE},
    errors::{AppError, AppResult},
    form::{RequestForm, ValidatedForm},
};

pub const JSON_FIELD: &str = "json";
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Complaint,
    Support,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complaint => write!(f, "complaint"),
            Self::Support => write!(f, "support"),
        }
    }
}

impl RequestKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Complaint => COMPLAINT_EMAIL_PATH,
            Self::Support => SUPPORT_EMAIL_PATH,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Complaint => "Submit Complaint",
            Self::Support => "Request Support",
        }
    }

    fn default_success(self) -> &'static str {
        match self {
            Self::Complaint => "Complaint submitted successfully!",
            Self::Support => "Support request submitted successfully!",
        }
    }

    fn default_failure(self) -> &'static str {
        match self {
            Self::Complaint => "Failed to submit complaint.",
            Self::Support => "Failed to submit support request. Please try again.",
        }
    }

    /// Support requests dismiss their form once they complete, whatever the
    /// outcome; complaint forms stay up.
    pub fn closes_after_submit(self) -> bool {
        matches!(self, Self::Support)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success(String),
    Failure(String),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(..))
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Success(..) => "Success",
            Self::Failure(..) => "Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Failure(m) => m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

/// Everything that goes into one multipart request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub json: String,
    pub file: Option<FilePart>,
}

#[derive(thiserror::Error, Debug)]
pub enum PayloadError {
    #[error("failed to encode json part: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Attachment(#[from] AppError),
    #[error("invalid attachment content type: {0}")]
    MimeType(#[source] reqwest::Error),
}

impl SubmissionPayload {
    /// The `json` part: the user's enquiry type (trimmed) for complaints, a
    /// fixed marker under the support endpoint's own key for support.
    pub fn json_for(kind: RequestKind, form: &RequestForm) -> Result<String, serde_json::Error> {
        match kind {
            RequestKind::Complaint => serde_json::to_string(&ComplaintJsonDto {
                name: &form.name,
                email: &form.email,
                phone: &form.phone,
                title: &form.title,
                enquiry_type: form.enquiry_type.trim(),
            }),
            RequestKind::Support => serde_json::to_string(&SupportJsonDto {
                name: &form.name,
                email: &form.email,
                phone: &form.phone,
                title: &form.title,
                enquertytype: SUPPORT_ENQUIRY_TYPE,
            }),
        }
    }

    pub async fn build(kind: RequestKind, form: &ValidatedForm) -> Result<Self, PayloadError> {
        let json = Self::json_for(kind, form.form())?;

        let file = match form.attachment() {
            Some(attachment) => Some(FilePart {
                file_name: attachment.file_name().to_owned(),
                mime_type: attachment.mime_type().to_owned(),
                content: attachments::read_content(attachment).await?,
            }),
            None => None,
        };

        Ok(Self { json, file })
    }

    pub fn into_multipart(self) -> Result<multipart::Form, PayloadError> {
        let form = multipart::Form::new().text(JSON_FIELD, self.json);

        let Some(file) = self.file else {
            return Ok(form);
        };

        let part = multipart::Part::bytes(file.content)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .map_err(PayloadError::MimeType)?;

        Ok(form.part(FILE_FIELD, part))
    }
}

/// Turns validated forms into intake requests, one at a time.
#[derive(Debug)]
pub struct RequestSubmitter {
    client: ApiClient,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RequestSubmitter {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> AppResult<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::SubmissionInFlight)?;

        Ok(InFlightGuard(&self.in_flight))
    }

    /// Sends exactly one request. Transport and server failures come back as
    /// [`SubmissionOutcome::Failure`]; the only error is a submission already
    /// being in flight.
    pub async fn submit(
        &self,
        kind: RequestKind,
        form: &ValidatedForm,
    ) -> AppResult<SubmissionOutcome> {
        let _guard = self.begin()?;

        let multipart = match SubmissionPayload::build(kind, form)
            .await
            .and_then(SubmissionPayload::into_multipart)
        {
            Ok(multipart) => multipart,
            Err(e) => {
                error!("Failed to prepare {kind} request: {e}");
                return Ok(SubmissionOutcome::Failure(kind.default_failure().to_owned()));
            }
        };

        info!("Submitting {kind} request");

        let outcome = match self.client.post_multipart(kind.endpoint(), multipart).await {
            Ok(body) => {
                debug!("Upload success: {body:?}");
                let message = body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| kind.default_success().to_owned());

                SubmissionOutcome::Success(message)
            }
            Err(e) => {
                error!("Upload failed: {e}");
                let message = e
                    .server_message()
                    .unwrap_or_else(|| kind.default_failure().to_owned());

                SubmissionOutcome::Failure(message)
            }
        };

        info!("Submitted {kind} request, success: {}", outcome.is_success());

        Ok(outcome)
    }
}
