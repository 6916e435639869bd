use serde::Serialize;
use thiserror::Error;

/// Client-level error type.
/// Every store, session and feedback call returns `Result<T, TrackerError>`;
/// nothing in this crate swallows one, presentation is up to the caller.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Auth(String),

    #[error("Request failed (status {status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Parse(e.to_string())
    }
}

/// What a UI shows for a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDisplay {
    pub code: &'static str,
    pub message: String,
}

impl TrackerError {
    /// Stable machine-readable code, one per variant.
    pub fn code(&self) -> &'static str {
        match self {
            TrackerError::Validation(_) => "VALIDATION_ERROR",
            TrackerError::NotFound(_) => "NOT_FOUND",
            TrackerError::Auth(_) => "UNAUTHORIZED",
            TrackerError::RequestFailed { .. } => "REQUEST_FAILED",
            TrackerError::Network(_) => "NETWORK_ERROR",
            TrackerError::Parse(_) => "PARSE_ERROR",
            TrackerError::Io(_) => "IO_ERROR",
        }
    }

    /// True when the UI should send the user back to the login screen.
    pub fn is_auth(&self) -> bool {
        matches!(self, TrackerError::Auth(_))
    }

    /// Converts the error into a user-facing code and message.
    /// Transport and decoding details are logged rather than shown.
    pub fn to_display(&self) -> ErrorDisplay {
        let message = match self {
            TrackerError::Validation(msg) | TrackerError::NotFound(msg) => msg.clone(),
            TrackerError::Auth(_) => "Please log in again".to_string(),
            TrackerError::RequestFailed { message, .. } => message.clone(),
            TrackerError::Network(e) => {
                tracing::error!("Network error: {e}");
                "Could not reach the server".to_string()
            }
            TrackerError::Parse(msg) => {
                tracing::error!("Unexpected response: {msg}");
                "The server sent an unexpected response".to_string()
            }
            TrackerError::Io(e) => format!("Could not read file: {e}"),
        };

        ErrorDisplay {
            code: self.code(),
            message,
        }
    }
}

/// Builds a `Validation` error listing every blank required field, or `Ok(())`.
pub(crate) fn require_fields(entity: &str, fields: &[(&str, bool)]) -> Result<(), TrackerError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TrackerError::Validation(format!(
            "{entity} is missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// True when an optional text value is present and not just whitespace.
pub(crate) fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
