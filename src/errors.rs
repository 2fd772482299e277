use log::*;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("{0}")]
    InvalidEmail(&'static str),
    #[error("{0}")]
    LoginFailed(String),
    #[error("{0}")]
    SignupFailed(String),
    #[error("{0}")]
    PermissionDenied(&'static str),
    #[error("a submission is already in progress")]
    SubmissionInFlight,

    #[error("storage I/O error: {0}")]
    StorageError(#[from] std::io::Error),
    #[error("failed to serialize stored state: {0}")]
    StateSerializationError(#[source] serde_json::Error),
    #[error("failed to deserialize stored state: {0}")]
    StateDeserializationError(#[source] serde_json::Error),
    #[error("cannot read attachment {path}: {source}")]
    AttachmentUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl AppError {
    /// Heading for the alert that surfaces this error.
    pub fn title(&self) -> &'static str {
        match self {
            AppError::InvalidEmail(..) => "Invalid Email",
            AppError::LoginFailed(..) => "Login Failed",
            AppError::PermissionDenied(..) => "Permission Required",
            _ => "Error",
        }
    }

    /// Logs internal failures; user-facing rejections are expected and stay quiet.
    pub fn report(&self) {
        match self {
            AppError::StorageError(..)
            | AppError::StateSerializationError(..)
            | AppError::StateDeserializationError(..)
            | AppError::AttachmentUnreadable { .. }
            | AppError::HttpClient(..) => {
                // debug prints enum variant name, display shows thiserror message
                error!("Encountered {self:?}: {self}");
            }
            _ => debug!("Rejected: {self}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_titles_follow_error_kind() {
        assert_eq!(AppError::InvalidInput("x").title(), "Error");
        assert_eq!(AppError::InvalidEmail("x").title(), "Invalid Email");
        assert_eq!(AppError::LoginFailed("x".into()).title(), "Login Failed");
        assert_eq!(
            AppError::PermissionDenied("x").title(),
            "Permission Required"
        );
        assert_eq!(AppError::SubmissionInFlight.title(), "Error");
    }

    #[test]
    fn user_facing_messages_are_passed_through() {
        let err = AppError::LoginFailed("Invalid credentials".to_owned());
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}
