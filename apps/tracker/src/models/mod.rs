pub mod application;
pub mod cover_letter;
pub mod dates;
pub mod document;
pub mod job;
pub mod resume;
pub mod status;
pub mod user;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the remote store to every persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

/// A record carrying a server-assigned identifier.
pub trait Identified {
    fn id(&self) -> RecordId;
}
