use std::time::Duration;

use log::*;
use reqwest::{multipart, StatusCode};
use serde::Serialize;

use crate::dto::{
    auth::{SignInDto, SignInResponseDto, SignUpDto},
    requests::MessageDto,
};

pub const SIGN_IN_PATH: &str = "/iisc/auth/sign-in";
pub const SIGN_UP_PATH: &str = "/iisc/auth/sign-up";
// spelled exactly as the server routes it
pub const COMPLAINT_EMAIL_PATH: &str = "/iisc/email/compalin-email";
pub const SUPPORT_EMAIL_PATH: &str = "/iisc/email/support-email";

const USER_AGENT: &str = "iisc-support-client";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ApiError {
    /// The `message` field of a JSON error body, when the server sent one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Status { body, .. } => serde_json::from_str::<MessageDto>(body)
                .ok()
                .and_then(|dto| dto.message)
                .filter(|message| !message.is_empty()),
            Self::Transport(..) => None,
        }
    }

    /// Short human description, for when no server message is available.
    pub fn describe(&self) -> String {
        match self {
            Self::Status { status, .. } => {
                format!("Request failed with status code {}", status.as_u16())
            }
            Self::Transport(e) if e.is_timeout() => "Request timed out".to_owned(),
            Self::Transport(..) => "Network Error".to_owned(),
        }
    }
}

/// Client for the fixed set of REST endpoints behind the app.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Without a `timeout`, whatever the transport defaults to applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let builder = reqwest::Client::builder().user_agent(USER_AGENT);

        let builder = if let Some(timeout) = timeout {
            builder.timeout(timeout)
        } else {
            builder
        };

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn sign_in(&self, dto: &SignInDto<'_>) -> Result<SignInResponseDto, ApiError> {
        let body = self.post_json(SIGN_IN_PATH, dto).await?;

        // a 2xx without the expected shape is treated as a refused login
        Ok(serde_json::from_value(body).unwrap_or_default())
    }

    pub async fn sign_up(&self, dto: &SignUpDto<'_>) -> Result<serde_json::Value, ApiError> {
        self.post_json(SIGN_UP_PATH, dto).await
    }

    /// Sends a multipart request. The client picks the boundary, so the
    /// `multipart/form-data` content type is never set by hand.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<MessageDto, ApiError> {
        let url = self.url(path);
        debug!("POST {url} (multipart)");

        let response = self.http.post(&url).multipart(form).send().await?;
        let body = Self::read_body(response).await?;

        Ok(serde_json::from_value(body).unwrap_or_default())
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.url(path);
        debug!("POST {url}");

        let response = self.http.post(&url).json(body).send().await?;

        Self::read_body(response).await
    }

    /// Reads the body of a response, failing on non-2xx statuses. A body that
    /// is not JSON comes back as a JSON string, an empty one as `null`.
    async fn read_body(response: reqwest::Response) -> Result<serde_json::Value, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status { status, body: text });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }
}
