use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::FormPart;
use crate::errors::{has_text, require_fields, TrackerError};
use crate::models::dates::deserialize_optional_date_time;
use crate::models::document::Document;
use crate::models::{Identified, RecordId};

/// Longest cover-letter text the backend accepts.
pub const MAX_CONTENT_LENGTH: usize = 8000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Backend workflow state, "Draft" on creation.
    #[serde(default)]
    pub status: Option<String>,
    pub application_id: RecordId,
    #[serde(default, deserialize_with = "deserialize_optional_date_time")]
    pub created_at: Option<NaiveDateTime>,
}

impl Identified for CoverLetter {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverLetterDraft {
    pub title: String,
    pub language: Option<String>,
    pub application_id: Option<RecordId>,
    pub document: Option<Document>,
}

impl CoverLetterDraft {
    pub fn new(title: impl Into<String>, application_id: RecordId, document: Document) -> Self {
        Self {
            title: title.into(),
            application_id: Some(application_id),
            document: Some(document),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        require_fields(
            "cover letter",
            &[
                ("title", has_text(Some(self.title.as_str()))),
                ("application_id", self.application_id.is_some()),
                ("file", self.document.is_some()),
            ],
        )?;
        match &self.document {
            Some(document) => validate_document(document),
            None => Ok(()),
        }
    }

    pub(crate) fn form_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![FormPart::text("title", self.title.trim())];
        if let Some(language) = &self.language {
            parts.push(FormPart::text("language", language.trim()));
        }
        if let Some(application_id) = self.application_id {
            parts.push(FormPart::text("application_id", application_id.to_string()));
        }
        parts.extend(self.document.iter().map(Document::form_part));
        parts
    }
}

/// Partial cover-letter update; only supplied fields are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverLetterPatch {
    pub title: Option<String>,
    pub language: Option<String>,
    pub application_id: Option<RecordId>,
    pub document: Option<Document>,
}

impl CoverLetterPatch {
    pub fn validate(&self) -> Result<(), TrackerError> {
        let title_kept = self.title.as_deref().map_or(true, |t| has_text(Some(t)));
        require_fields("cover letter update", &[("title", title_kept)])?;
        match &self.document {
            Some(document) => validate_document(document),
            None => Ok(()),
        }
    }

    pub(crate) fn form_parts(&self) -> Vec<FormPart> {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(FormPart::text("title", title.trim()));
        }
        if let Some(language) = &self.language {
            parts.push(FormPart::text("language", language.trim()));
        }
        if let Some(application_id) = self.application_id {
            parts.push(FormPart::text("application_id", application_id.to_string()));
        }
        parts.extend(self.document.iter().map(Document::form_part));
        parts
    }
}

fn validate_document(document: &Document) -> Result<(), TrackerError> {
    document.validate()?;
    if let Document::Text(text) = document {
        let length = text.trim().chars().count();
        if length > MAX_CONTENT_LENGTH {
            return Err(TrackerError::Validation(format!(
                "cover letter content is {length} characters, the limit is {MAX_CONTENT_LENGTH}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_payload() {
        let letter: CoverLetter = serde_json::from_value(json!({
            "id": 11,
            "title": "Acme letter",
            "language": " English ",
            "content": "Dear Acme",
            "status": "Draft",
            "created_at": "2025-02-04T10:00:00.000001",
            "application_id": 7
        }))
        .unwrap();
        assert_eq!(letter.application_id, RecordId(7));
        assert_eq!(letter.language.as_deref(), Some(" English "));
    }

    #[test]
    fn test_draft_requires_application_and_document() {
        let draft = CoverLetterDraft {
            title: "Acme letter".to_string(),
            ..Default::default()
        };
        let err = draft.validate().unwrap_err().to_string();
        assert!(err.contains("application_id"));
        assert!(err.contains("file"));
    }

    #[test]
    fn test_overlong_text_rejected() {
        let draft = CoverLetterDraft::new(
            "Acme letter",
            RecordId(7),
            Document::Text("x".repeat(MAX_CONTENT_LENGTH + 1)),
        );
        assert!(matches!(draft.validate(), Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_form_parts_in_backend_field_names() {
        let mut draft = CoverLetterDraft::new(
            "Acme letter",
            RecordId(7),
            Document::Text("Dear Acme".to_string()),
        );
        draft.language = Some("French".to_string());
        assert_eq!(
            draft.form_parts(),
            vec![
                FormPart::text("title", "Acme letter"),
                FormPart::text("language", "French"),
                FormPart::text("application_id", "7"),
                FormPart::text("content", "Dear Acme"),
            ]
        );
    }

    #[test]
    fn test_empty_patch_sends_nothing() {
        assert!(CoverLetterPatch::default().form_parts().is_empty());
    }
}
