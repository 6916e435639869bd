use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{has_text, require_fields, TrackerError};
use crate::models::dates::deserialize_optional_date_time;
use crate::models::job::Job;
use crate::models::status::{deserialize_optional_status, ApplicationStatus};
use crate::models::{Identified, RecordId};

/// A submitted application, as returned by the list endpoint with the job embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: RecordId,
    pub title: String,
    pub job_id: RecordId,
    #[serde(default)]
    pub resume_id: Option<RecordId>,
    #[serde(default, deserialize_with = "deserialize_optional_status")]
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_date_time")]
    pub submitted_at: Option<NaiveDateTime>,
    #[serde(default, rename = "user_id")]
    pub owner_id: Option<RecordId>,
    #[serde(default)]
    pub job: Option<Job>,
}

impl Identified for Application {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Application {
    pub fn deadline(&self) -> Option<NaiveDate> {
        self.job.as_ref().and_then(|job| job.deadline)
    }

    pub fn company(&self) -> Option<&str> {
        self.job.as_ref().map(|job| job.company.as_str())
    }
}

/// Payload for creating an application. `job_id` must be a confirmed
/// identifier; creating the job first is the caller's job (see `Workspace`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationDraft {
    pub title: String,
    pub job_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
}

impl ApplicationDraft {
    pub fn new(title: impl Into<String>, job_id: RecordId) -> Self {
        Self {
            title: title.into(),
            job_id: Some(job_id),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        require_fields(
            "application",
            &[
                ("title", has_text(Some(self.title.as_str()))),
                ("job_id", self.job_id.is_some()),
            ],
        )
    }
}

/// Partial application update. `resume_id: Some(None)` detaches the resume,
/// `status: Some(None)` clears the status.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<Option<RecordId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<ApplicationStatus>>,
}

impl ApplicationPatch {
    pub fn validate(&self) -> Result<(), TrackerError> {
        let title_kept = self.title.as_deref().map_or(true, |t| has_text(Some(t)));
        require_fields("application update", &[("title", title_kept)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_payload_with_http_dates() {
        let app: Application = serde_json::from_value(json!({
            "id": 7,
            "title": "Backend role",
            "submitted_at": "Mon, 03 Feb 2025 14:05:00 GMT",
            "status": "interview",
            "user_id": 1,
            "job_id": 3,
            "resume_id": null,
            "job": {
                "id": 3,
                "title": "Backend Engineer",
                "description": "Build APIs",
                "company": "Acme",
                "location": "Remote",
                "employment_type": "Full-time",
                "job_url": null,
                "deadline": "Sat, 01 Mar 2025 00:00:00 GMT"
            }
        }))
        .unwrap();

        assert_eq!(app.status, Some(ApplicationStatus::Interview));
        assert_eq!(app.deadline(), NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(app.company(), Some("Acme"));
        assert!(app.resume_id.is_none());
        assert_eq!(
            app.submitted_at.map(|t| t.date()),
            NaiveDate::from_ymd_opt(2025, 2, 3)
        );
    }

    #[test]
    fn test_blank_status_and_missing_job() {
        let app: Application = serde_json::from_value(json!({
            "id": 8,
            "title": "Speculative",
            "job_id": 4,
            "status": "  ",
            "job": null
        }))
        .unwrap();

        assert!(app.status.is_none());
        assert!(app.deadline().is_none());
    }

    #[test]
    fn test_draft_requires_job_id() {
        let draft = ApplicationDraft {
            title: "Backend role".to_string(),
            ..Default::default()
        };
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref msg) if msg.contains("job_id")));
    }

    #[test]
    fn test_draft_body_omits_unset_optionals() {
        let draft = ApplicationDraft::new("Backend role", RecordId(3));
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body, json!({"title": "Backend role", "job_id": 3}));
    }

    #[test]
    fn test_patch_can_detach_resume() {
        let patch = ApplicationPatch {
            resume_id: Some(None),
            status: Some(Some(ApplicationStatus::Rejected)),
            ..Default::default()
        };
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, json!({"resume_id": null, "status": "Rejected"}));
    }
}
