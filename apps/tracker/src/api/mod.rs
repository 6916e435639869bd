//! Request/response seam between the client core and the remote backend.
//!
//! Stores, the session manager and the feedback client only ever talk to a
//! `Transport`. `HttpTransport` is the production implementation; tests plug
//! in scripted transports.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::TrackerError;
use crate::models::document::DocumentUpload;
use crate::session::Session;

pub mod http;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One field of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        upload: DocumentUpload,
    },
}

impl FormPart {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        FormPart::Text {
            name,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    /// `name=value` session cookie sent as the `Cookie` header.
    pub session_cookie: Option<String>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            session_cookie: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, RequestBody::Empty)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path, RequestBody::Empty)
    }

    pub fn post_empty(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path, RequestBody::Empty)
    }

    pub fn post_json<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self, TrackerError> {
        Ok(Self::new(Method::Post, path, RequestBody::Json(serde_json::to_value(body)?)))
    }

    pub fn put_json<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self, TrackerError> {
        Ok(Self::new(Method::Put, path, RequestBody::Json(serde_json::to_value(body)?)))
    }

    pub fn post_form(path: impl Into<String>, parts: Vec<FormPart>) -> Self {
        Self::new(Method::Post, path, RequestBody::Multipart(parts))
    }

    pub fn put_form(path: impl Into<String>, parts: Vec<FormPart>) -> Self {
        Self::new(Method::Put, path, RequestBody::Multipart(parts))
    }

    pub fn with_session(mut self, session: &Session) -> Self {
        self.session_cookie = Some(session.cookie().to_string());
        self
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Raw backend response, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    /// `name=value` pair from the first usable `Set-Cookie` header.
    pub set_cookie: Option<String>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            set_cookie: None,
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Maps non-2xx statuses onto the error taxonomy:
    /// 401/403 become `Auth`, everything else `RequestFailed`.
    pub fn into_result(self) -> Result<Value, TrackerError> {
        if self.is_success() {
            return Ok(self.body);
        }
        let message = error_message(&self.body)
            .unwrap_or_else(|| format!("request failed with status {}", self.status));
        match self.status {
            401 | 403 => Err(TrackerError::Auth(message)),
            status => Err(TrackerError::RequestFailed { status, message }),
        }
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, TrackerError> {
        let body = self.into_result()?;
        serde_json::from_value(body).map_err(|e| TrackerError::Parse(e.to_string()))
    }
}

/// Extracts the backend's `{"error": "..."}` message, or a plain-text body.
fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => map
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

/// The request/response contract with the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TrackerError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unauthorized_maps_to_auth() {
        let err = ApiResponse::new(401, json!({"error": "Unauthorized"}))
            .into_result()
            .unwrap_err();
        assert!(matches!(err, TrackerError::Auth(ref msg) if msg == "Unauthorized"));
    }

    #[test]
    fn test_server_error_carries_backend_message() {
        let err = ApiResponse::new(500, json!({"error": "Internal server error"}))
            .into_result()
            .unwrap_err();
        match err {
            TrackerError::RequestFailed { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal server error");
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_error_without_body_gets_generic_message() {
        let err = ApiResponse::new(404, Value::Null).into_result().unwrap_err();
        assert_eq!(err.to_string(), "Request failed (status 404): request failed with status 404");
    }

    #[test]
    fn test_decode_shape_mismatch_is_parse_error() {
        let result: Result<Vec<i64>, _> = ApiResponse::ok(json!({"not": "a list"})).decode();
        assert!(matches!(result, Err(TrackerError::Parse(_))));
    }

    #[test]
    fn test_with_session_attaches_cookie() {
        let session = testing::session();
        let request = ApiRequest::get("/api/jobs/list").with_session(&session);
        assert_eq!(request.session_cookie.as_deref(), Some("session=test-cookie"));
        assert_eq!(request.method, Method::Get);
        assert!(request.json_body().is_none());
    }
}
