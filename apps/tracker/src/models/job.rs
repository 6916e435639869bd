use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{has_text, require_fields, TrackerError};
use crate::models::dates::{deserialize_optional_date, deserialize_optional_date_time};
use crate::models::{Identified, RecordId};

/// Employment type the backend assigns when none is given.
pub const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";

/// A job posting. Also used for the job snapshot embedded in applications,
/// which omits `date_posted` and `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: RecordId,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date_time")]
    pub date_posted: Option<NaiveDateTime>,
    #[serde(default, rename = "user_id")]
    pub owner_id: Option<RecordId>,
}

impl Identified for Job {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Job {
    pub fn employment_type_or_default(&self) -> &str {
        self.employment_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_EMPLOYMENT_TYPE)
    }
}

/// Payload for creating a job. Title, company and description are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub description: String,
}

impl JobDraft {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        require_fields(
            "job",
            &[
                ("title", has_text(Some(self.title.as_str()))),
                ("company", has_text(Some(self.company.as_str()))),
                ("description", has_text(Some(self.description.as_str()))),
            ],
        )
    }

    /// Copy with surrounding whitespace removed and blank optionals dropped.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: trim_optional(&self.location),
            employment_type: trim_optional(&self.employment_type),
            job_url: trim_optional(&self.job_url),
            deadline: self.deadline,
            description: self.description.trim().to_string(),
        }
    }
}

/// Partial job update. `None` fields are left out of the request;
/// `deadline: Some(None)` clears the deadline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobPatch {
    /// Required fields may be changed but not blanked.
    pub fn validate(&self) -> Result<(), TrackerError> {
        let keeps = |field: &Option<String>| field.as_deref().map_or(true, |v| has_text(Some(v)));
        require_fields(
            "job update",
            &[
                ("title", keeps(&self.title)),
                ("company", keeps(&self.company)),
                ("description", keeps(&self.description)),
            ],
        )
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn trim_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_from_list_payload() {
        let job: Job = serde_json::from_value(json!({
            "id": 3,
            "title": "Backend Engineer",
            "company": "Acme",
            "location": null,
            "job_url": "https://acme.example/jobs/3",
            "description": "Build APIs",
            "date_posted": "2025-02-10T09:15:00.512000",
            "deadline": "2025-03-01T00:00:00",
            "employment_type": "Contract",
            "user_id": 1
        }))
        .unwrap();

        assert_eq!(job.id, RecordId(3));
        assert_eq!(job.deadline, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(job.owner_id, Some(RecordId(1)));
        assert_eq!(job.employment_type_or_default(), "Contract");
    }

    #[test]
    fn test_embedded_snapshot_without_owner() {
        let job: Job = serde_json::from_value(json!({
            "id": 3,
            "title": "Backend Engineer",
            "company": "Acme",
            "deadline": "Sat, 01 Mar 2025 00:00:00 GMT",
            "employment_type": null
        }))
        .unwrap();

        assert!(job.owner_id.is_none());
        assert_eq!(job.deadline, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(job.employment_type_or_default(), DEFAULT_EMPLOYMENT_TYPE);
    }

    #[test]
    fn test_draft_requires_title_company_description() {
        let draft = JobDraft::new("  ", "Acme", "");
        let err = draft.validate().unwrap_err().to_string();
        assert!(err.contains("title"));
        assert!(err.contains("description"));
        assert!(!err.contains("company"));
    }

    #[test]
    fn test_draft_serializes_deadline_as_plain_date() {
        let mut draft = JobDraft::new("Engineer", "Acme", "Build things");
        draft.deadline = NaiveDate::from_ymd_opt(2025, 4, 15);
        draft.location = Some("   ".to_string());
        let body = serde_json::to_value(draft.trimmed()).unwrap();
        assert_eq!(body["deadline"], "2025-04-15");
        assert!(body.get("location").is_none());
    }

    #[test]
    fn test_patch_sends_only_supplied_fields() {
        let patch = JobPatch {
            company: Some("Initech".to_string()),
            deadline: Some(None),
            ..Default::default()
        };
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, json!({"company": "Initech", "deadline": null}));
    }

    #[test]
    fn test_patch_cannot_blank_required_field() {
        let patch = JobPatch {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(JobPatch::default().validate().is_ok());
        assert!(JobPatch::default().is_empty());
    }
}
