use std::fmt;

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

/// Application progress. The backend stores free text, so anything outside the
/// known labels is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApplicationStatus {
    Pending,
    Applied,
    InProgress,
    Interview,
    Rejected,
    Other(String),
}

/// Badge colour for statuses the tracker does not recognise.
pub const NEUTRAL_COLOR: &str = "#9ca3af";

impl ApplicationStatus {
    /// Parses a status label. Known labels match case-insensitively after
    /// trimming; blank input means "no status".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let status = match trimmed.to_ascii_lowercase().as_str() {
            "pending" => ApplicationStatus::Pending,
            "applied" => ApplicationStatus::Applied,
            "in progress" | "in-progress" | "in_progress" => ApplicationStatus::InProgress,
            "interview" => ApplicationStatus::Interview,
            "rejected" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Other(trimmed.to_string()),
        };
        Some(status)
    }

    /// Label as stored by the backend.
    pub fn label(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::InProgress => "In Progress",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Other(label) => label,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "#2563eb",
            ApplicationStatus::InProgress => "#10b981",
            ApplicationStatus::Interview => "#ff9d00",
            ApplicationStatus::Rejected => "#ef4444",
            ApplicationStatus::Pending => "#6b7280",
            ApplicationStatus::Other(_) => NEUTRAL_COLOR,
        }
    }

    /// CSS class for the status badge, e.g. `status-in-progress`.
    pub fn css_class(&self) -> String {
        let slug: Vec<String> = self
            .label()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        format!("status-{}", slug.join("-"))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ApplicationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ApplicationStatus::parse(&raw).ok_or_else(|| D::Error::custom("blank application status"))
    }
}

/// Decodes a nullable status where blank strings also mean "no status".
pub fn deserialize_optional_status<'de, D>(
    deserializer: D,
) -> Result<Option<ApplicationStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ApplicationStatus::parse))
}
