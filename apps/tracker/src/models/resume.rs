use serde::{Deserialize, Serialize};

use crate::api::FormPart;
use crate::errors::{has_text, require_fields, TrackerError};
use crate::models::document::Document;
use crate::models::{Identified, RecordId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    /// Text the backend extracted from the uploaded document.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "user_id")]
    pub owner_id: Option<RecordId>,
}

impl Identified for Resume {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Resume {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled resume")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDraft {
    pub title: String,
    pub document: Option<Document>,
}

impl ResumeDraft {
    pub fn new(title: impl Into<String>, document: Document) -> Self {
        Self {
            title: title.into(),
            document: Some(document),
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        require_fields(
            "resume",
            &[
                ("title", has_text(Some(self.title.as_str()))),
                ("file", self.document.is_some()),
            ],
        )?;
        match &self.document {
            Some(document) => document.validate(),
            None => Ok(()),
        }
    }

    pub(crate) fn form_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![FormPart::text("title", self.title.trim())];
        parts.extend(self.document.iter().map(Document::form_part));
        parts
    }
}

/// Partial resume update: a new title, a replacement document, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub document: Option<Document>,
}

impl ResumePatch {
    pub fn validate(&self) -> Result<(), TrackerError> {
        let title_kept = self.title.as_deref().map_or(true, |t| has_text(Some(t)));
        require_fields("resume update", &[("title", title_kept)])?;
        match &self.document {
            Some(document) => document.validate(),
            None => Ok(()),
        }
    }

    pub(crate) fn form_parts(&self) -> Vec<FormPart> {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(FormPart::text("title", title.trim()));
        }
        parts.extend(self.document.iter().map(Document::form_part));
        parts
    }
}
