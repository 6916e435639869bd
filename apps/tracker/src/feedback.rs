//! AI cover-letter feedback.
//!
//! The backend relays the model's answer as `{"feedback": ...}` where the
//! value is either an object or the raw model text, which itself holds JSON,
//! sometimes wrapped in Markdown code fences.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiRequest, Transport};
use crate::errors::{has_text, require_fields, TrackerError};
use crate::models::cover_letter::CoverLetter;
use crate::models::job::Job;
use crate::models::resume::Resume;
use crate::session::Session;

pub const FEEDBACK_PATH: &str = "/api/ai/feedback";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackRequest {
    pub resume: String,
    pub job: String,
    pub cover_letter: String,
}

impl FeedbackRequest {
    /// Assembles the request from stored records: the resume's extracted
    /// text, the job description and the cover letter's content.
    pub fn from_records(
        resume: Option<&Resume>,
        job: Option<&Job>,
        cover_letter: Option<&CoverLetter>,
    ) -> Self {
        let text = |value: Option<&String>| value.map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            resume: text(resume.and_then(|r| r.content.as_ref())),
            job: text(job.and_then(|j| j.description.as_ref())),
            cover_letter: text(cover_letter.and_then(|c| c.content.as_ref())),
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        require_fields(
            "feedback request",
            &[
                ("resume", has_text(Some(self.resume.as_str()))),
                ("job", has_text(Some(self.job.as_str()))),
                ("cover_letter", has_text(Some(self.cover_letter.as_str()))),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterFeedback {
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub tone_feedback: Option<String>,
}

#[derive(Clone)]
pub struct FeedbackClient {
    transport: Arc<dyn Transport>,
}

impl FeedbackClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn request(
        &self,
        session: &Session,
        request: &FeedbackRequest,
    ) -> Result<CoverLetterFeedback, TrackerError> {
        request.validate()?;
        let api_request = ApiRequest::post_json(FEEDBACK_PATH, request)?.with_session(session);

        debug!(
            "Requesting feedback ({} chars of cover letter)",
            request.cover_letter.len()
        );
        let body = self.transport.send(api_request).await?.into_result()?;
        decode_feedback(body)
    }
}

/// Decodes the `{"feedback": ...}` envelope, unwrapping a string payload.
pub fn decode_feedback(body: Value) -> Result<CoverLetterFeedback, TrackerError> {
    let payload = match body {
        Value::Object(mut map) => map
            .remove("feedback")
            .ok_or_else(|| TrackerError::Parse("feedback response has no 'feedback' field".to_string()))?,
        other => {
            return Err(TrackerError::Parse(format!(
                "feedback response is not an object: {other}"
            )))
        }
    };

    match payload {
        Value::String(text) => serde_json::from_str(strip_json_fences(&text)).map_err(|e| {
            warn!("Undecodable feedback text: {e}");
            TrackerError::Parse(format!("feedback text is not valid JSON: {e}"))
        }),
        value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(TrackerError::Parse(format!(
            "unexpected feedback payload: {other}"
        ))),
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences around model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let inner = inner.trim_start();
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
