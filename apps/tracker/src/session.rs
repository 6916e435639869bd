//! Authenticated session state.
//!
//! `SessionManager` is the only writer of the session. Every other component
//! receives `&Session` explicitly and never stores it.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::api::{ApiRequest, Transport};
use crate::errors::TrackerError;
use crate::models::user::{Credentials, Registration, User};

const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";
const LOGOUT_PATH: &str = "/api/auth/logout";
const ME_PATH: &str = "/api/auth/me";

/// Cookie credential plus the user it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    cookie: String,
    user: User,
}

impl Session {
    pub(crate) fn new(cookie: String, user: User) -> Self {
        Self { cookie, user }
    }

    /// `name=value` pair sent as the `Cookie` header.
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cookie", &"<redacted>")
            .field("user", &self.user.username)
            .finish()
    }
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    current: Option<Session>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// The current session, or `Auth` when nobody is logged in.
    pub fn require(&self) -> Result<&Session, TrackerError> {
        self.current
            .as_ref()
            .ok_or_else(|| TrackerError::Auth("not logged in".to_string()))
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, TrackerError> {
        registration.validate()?;
        let request = ApiRequest::post_json(REGISTER_PATH, registration)?;
        let envelope: UserEnvelope = self.transport.send(request).await?.decode()?;
        info!("Registered user {}", envelope.user.username);
        Ok(envelope.user)
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session, TrackerError> {
        credentials.validate()?;
        let request = ApiRequest::post_json(LOGIN_PATH, credentials)?;
        let response = self.transport.send(request).await?;

        let cookie = response.set_cookie.clone();
        let envelope: UserEnvelope = response.decode()?;
        let cookie = cookie.ok_or_else(|| {
            TrackerError::Auth("login succeeded but no session cookie was set".to_string())
        })?;

        let session = Session::new(cookie, envelope.user);
        info!("Logged in as {}", session.user.username);
        self.current = Some(session.clone());
        Ok(session)
    }

    /// Ends the session. Local state is cleared even when the backend call
    /// fails; the failure is still returned.
    pub async fn logout(&mut self) -> Result<(), TrackerError> {
        let Some(session) = self.current.take() else {
            return Ok(());
        };
        let request = ApiRequest::post_empty(LOGOUT_PATH).with_session(&session);
        match self.transport.send(request).await.and_then(|r| r.into_result()) {
            Ok(_) => {
                info!("Logged out {}", session.user.username);
                Ok(())
            }
            Err(e) => {
                warn!("Logout call failed, session dropped locally: {e}");
                Err(e)
            }
        }
    }

    pub async fn me(&self, session: &Session) -> Result<User, TrackerError> {
        let request = ApiRequest::get(ME_PATH).with_session(session);
        self.transport.send(request).await?.decode()
    }
}
