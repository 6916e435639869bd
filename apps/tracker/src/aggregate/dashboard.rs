use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::UNSPECIFIED;
use crate::models::application::Application;
use crate::models::RecordId;

/// How many upcoming deadlines the dashboard lists.
pub const UPCOMING_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingDeadline {
    pub application_id: RecordId,
    pub title: String,
    pub company: Option<String>,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_applications: usize,
    pub unique_jobs: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
}

/// Applications per status label. Applications without a status are counted
/// under `Unspecified`, so the values always sum to `applications.len()`.
///
/// Buckets are keyed by the parsed status, not the raw backend string: known
/// labels merge across case and whitespace (`" applied"` counts as `Applied`),
/// while unknown labels are only trimmed and keep their case.
pub fn status_tally(applications: &[Application]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for application in applications {
        let label = application
            .status
            .as_ref()
            .map_or(UNSPECIFIED, |status| status.label());
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

/// The next deadlines on or after `today`, earliest first.
/// Ties keep collection order.
pub fn upcoming_deadlines(applications: &[Application], today: NaiveDate) -> Vec<UpcomingDeadline> {
    let mut upcoming: Vec<UpcomingDeadline> = applications
        .iter()
        .filter_map(|application| {
            let deadline = application.deadline()?;
            (deadline >= today).then(|| UpcomingDeadline {
                application_id: application.id,
                title: application.title.clone(),
                company: application.company().map(str::to_string),
                deadline,
            })
        })
        .collect();

    upcoming.sort_by_key(|entry| entry.deadline);
    upcoming.truncate(UPCOMING_LIMIT);
    upcoming
}

pub fn unique_job_count(applications: &[Application]) -> usize {
    applications
        .iter()
        .map(|application| application.job_id)
        .collect::<HashSet<_>>()
        .len()
}

pub fn summarize(applications: &[Application], today: NaiveDate) -> DashboardSummary {
    DashboardSummary {
        total_applications: applications.len(),
        unique_jobs: unique_job_count(applications),
        status_counts: status_tally(applications),
        upcoming_deadlines: upcoming_deadlines(applications, today),
    }
}
