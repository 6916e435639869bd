use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{has_text, require_fields, TrackerError};
use crate::models::dates::deserialize_optional_date_time;
use crate::models::{Identified, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date_time")]
    pub created_at: Option<NaiveDateTime>,
}

impl Identified for User {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        require_fields(
            "login",
            &[
                ("username", has_text(Some(self.username.as_str()))),
                ("password", !self.password.is_empty()),
            ],
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), TrackerError> {
        require_fields(
            "registration",
            &[
                ("username", has_text(Some(self.username.as_str()))),
                ("email", has_text(Some(self.email.as_str()))),
                ("password", !self.password.is_empty()),
            ],
        )
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
