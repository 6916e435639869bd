//! Per-resource wire contracts: paths and request bodies for each entity type.

use std::fmt::Debug;

use serde::de::DeserializeOwned;

use crate::api::ApiRequest;
use crate::errors::TrackerError;
use crate::models::application::{Application, ApplicationDraft, ApplicationPatch};
use crate::models::cover_letter::{CoverLetter, CoverLetterDraft, CoverLetterPatch};
use crate::models::job::{Job, JobDraft, JobPatch};
use crate::models::resume::{Resume, ResumeDraft, ResumePatch};
use crate::models::{Identified, RecordId};

/// A remote collection the client can list, create, update and delete.
///
/// Request builders validate their input, so a `Validation` error is always
/// raised before anything reaches the transport.
pub trait Resource {
    type Entity: Identified + DeserializeOwned + Clone + Debug + Send + Sync;
    type Draft: Debug + Send + Sync;
    type Patch: Debug + Send + Sync;

    /// Singular name used in log lines and error messages.
    const NAME: &'static str;

    fn list_path() -> &'static str;
    fn create_request(draft: &Self::Draft) -> Result<ApiRequest, TrackerError>;
    fn update_request(id: RecordId, patch: &Self::Patch) -> Result<ApiRequest, TrackerError>;
    fn delete_path(id: RecordId) -> String;

    /// Record this entity belongs to, when the resource is grouped by one.
    fn parent_id(_entity: &Self::Entity) -> Option<RecordId> {
        None
    }
}

pub struct Jobs;

impl Resource for Jobs {
    type Entity = Job;
    type Draft = JobDraft;
    type Patch = JobPatch;

    const NAME: &'static str = "job";

    fn list_path() -> &'static str {
        "/api/jobs/list"
    }

    fn create_request(draft: &JobDraft) -> Result<ApiRequest, TrackerError> {
        draft.validate()?;
        ApiRequest::post_json("/api/jobs/create", &draft.trimmed())
    }

    fn update_request(id: RecordId, patch: &JobPatch) -> Result<ApiRequest, TrackerError> {
        patch.validate()?;
        ApiRequest::put_json(format!("/api/jobs/{id}"), patch)
    }

    fn delete_path(id: RecordId) -> String {
        format!("/api/jobs/{id}")
    }
}

pub struct Applications;

impl Resource for Applications {
    type Entity = Application;
    type Draft = ApplicationDraft;
    type Patch = ApplicationPatch;

    const NAME: &'static str = "application";

    fn list_path() -> &'static str {
        "/api/applications/list"
    }

    fn create_request(draft: &ApplicationDraft) -> Result<ApiRequest, TrackerError> {
        draft.validate()?;
        ApiRequest::post_json("/api/applications/create", draft)
    }

    fn update_request(id: RecordId, patch: &ApplicationPatch) -> Result<ApiRequest, TrackerError> {
        patch.validate()?;
        ApiRequest::put_json(format!("/api/applications/update/{id}"), patch)
    }

    fn delete_path(id: RecordId) -> String {
        format!("/api/applications/delete/{id}")
    }
}

pub struct Resumes;

impl Resource for Resumes {
    type Entity = Resume;
    type Draft = ResumeDraft;
    type Patch = ResumePatch;

    const NAME: &'static str = "resume";

    fn list_path() -> &'static str {
        "/api/resumes/list"
    }

    fn create_request(draft: &ResumeDraft) -> Result<ApiRequest, TrackerError> {
        draft.validate()?;
        Ok(ApiRequest::post_form("/api/resumes/create", draft.form_parts()))
    }

    fn update_request(id: RecordId, patch: &ResumePatch) -> Result<ApiRequest, TrackerError> {
        patch.validate()?;
        Ok(ApiRequest::put_form(
            format!("/api/resumes/update/{id}"),
            patch.form_parts(),
        ))
    }

    fn delete_path(id: RecordId) -> String {
        format!("/api/resumes/delete/{id}")
    }
}

pub struct CoverLetters;

impl Resource for CoverLetters {
    type Entity = CoverLetter;
    type Draft = CoverLetterDraft;
    type Patch = CoverLetterPatch;

    const NAME: &'static str = "cover letter";

    fn list_path() -> &'static str {
        "/api/cover-letters/list"
    }

    fn create_request(draft: &CoverLetterDraft) -> Result<ApiRequest, TrackerError> {
        draft.validate()?;
        Ok(ApiRequest::post_form(
            "/api/cover-letters/create",
            draft.form_parts(),
        ))
    }

    fn update_request(id: RecordId, patch: &CoverLetterPatch) -> Result<ApiRequest, TrackerError> {
        patch.validate()?;
        Ok(ApiRequest::put_form(
            format!("/api/cover-letters/update/{id}"),
            patch.form_parts(),
        ))
    }

    fn delete_path(id: RecordId) -> String {
        format!("/api/cover-letters/delete/{id}")
    }

    fn parent_id(letter: &CoverLetter) -> Option<RecordId> {
        Some(letter.application_id)
    }
}
