//! The four collection stores plus the flows that span more than one.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::{self, DashboardSummary};
use crate::api::Transport;
use crate::errors::{has_text, require_fields, TrackerError};
use crate::feedback::{CoverLetterFeedback, FeedbackClient, FeedbackRequest};
use crate::models::application::{Application, ApplicationDraft};
use crate::models::cover_letter::CoverLetter;
use crate::models::job::JobDraft;
use crate::models::resume::Resume;
use crate::models::status::ApplicationStatus;
use crate::models::RecordId;
use crate::session::Session;
use crate::store::{ApplicationStore, CoverLetterStore, JobStore, ResumeStore};

/// The job an application is for: one already saved, or one to save first.
#[derive(Debug, Clone, PartialEq)]
pub enum JobChoice {
    Existing(RecordId),
    New(JobDraft),
}

/// Input of the "new application" flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationForm {
    pub title: String,
    pub job: JobChoice,
    pub resume_id: Option<RecordId>,
    pub status: Option<ApplicationStatus>,
}

/// An application joined with its resume and first cover letter.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationView<'a> {
    pub application: &'a Application,
    pub resume: Option<&'a Resume>,
    pub cover_letter: Option<&'a CoverLetter>,
}

pub struct Workspace {
    pub jobs: JobStore,
    pub applications: ApplicationStore,
    pub resumes: ResumeStore,
    pub cover_letters: CoverLetterStore,
    pub feedback: FeedbackClient,
}

impl Workspace {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            jobs: JobStore::new(transport.clone()),
            applications: ApplicationStore::new(transport.clone()),
            resumes: ResumeStore::new(transport.clone()),
            cover_letters: CoverLetterStore::new(transport.clone()),
            feedback: FeedbackClient::new(transport),
        }
    }

    /// Loads every collection concurrently. Returns once all four are done,
    /// or with the first failure.
    pub async fn load_all(&mut self, session: &Session) -> Result<(), TrackerError> {
        tokio::try_join!(
            self.jobs.load(session),
            self.applications.load(session),
            self.resumes.load(session),
            self.cover_letters.load(session),
        )?;
        info!(
            "Loaded {} job(s), {} application(s), {} resume(s), {} cover letter(s)",
            self.jobs.len(),
            self.applications.len(),
            self.resumes.len(),
            self.cover_letters.len()
        );
        Ok(())
    }

    /// Creates an application, saving a new job first when one is given.
    /// The application is only sent once the job id is confirmed; a failed
    /// job create stops the flow.
    pub async fn submit_application(
        &mut self,
        session: &Session,
        form: ApplicationForm,
    ) -> Result<&Application, TrackerError> {
        require_fields("application", &[("title", has_text(Some(form.title.as_str())))])?;

        let job_id = match form.job {
            JobChoice::Existing(id) => id,
            JobChoice::New(draft) => self.jobs.create(session, &draft).await?.id,
        };

        let draft = ApplicationDraft {
            title: form.title.trim().to_string(),
            job_id: Some(job_id),
            resume_id: form.resume_id,
            status: form.status,
        };
        self.applications.create(session, &draft).await
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        aggregate::summarize(self.applications.items(), today)
    }

    pub fn language_tally(&self) -> BTreeMap<String, usize> {
        aggregate::language_tally(self.cover_letters.items())
    }

    /// Joins through the stores' indexes, which are refreshed on load and
    /// on every confirmed mutation.
    pub fn application_views(&self) -> Vec<ApplicationView<'_>> {
        self.applications
            .items()
            .iter()
            .map(|application| ApplicationView {
                application,
                resume: application.resume_id.and_then(|id| self.resumes.get(id)),
                cover_letter: self.cover_letters.first_for_application(application.id),
            })
            .collect()
    }

    /// Requests AI feedback on an application's cover letter, against its
    /// resume and job description.
    pub async fn feedback_for(
        &self,
        session: &Session,
        application_id: RecordId,
    ) -> Result<CoverLetterFeedback, TrackerError> {
        let application = self.applications.get(application_id).ok_or_else(|| {
            TrackerError::NotFound(format!("application {application_id} is not loaded"))
        })?;

        let resume = application.resume_id.and_then(|id| self.resumes.get(id));
        let job = self
            .jobs
            .get(application.job_id)
            .or(application.job.as_ref());
        let cover_letter = self.cover_letters.first_for_application(application.id);

        let request = FeedbackRequest::from_records(resume, job, cover_letter);
        self.feedback.request(session, &request).await
    }
}
