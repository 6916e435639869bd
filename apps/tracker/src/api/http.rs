//! reqwest-backed transport. The only place the client touches the network.
//!
//! No retries: a failed call surfaces to the caller, who decides whether to
//! re-initiate it.

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiRequest, ApiResponse, FormPart, Method, RequestBody, Transport};
use crate::errors::TrackerError;

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TrackerError> {
        Ok(Self::with_client(base_url, Client::builder().build()?))
    }

    /// Uses a preconfigured client (proxy settings, TLS roots, ...).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TrackerError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if let Some(cookie) = &request.session_cookie {
            builder = builder.header(COOKIE, cookie);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        debug!("{:?} {}", request.method, url);
        let response = builder.send().await?;

        let status = response.status();
        let set_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(cookie_pair);
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(body) => body,
                Err(e) if status.is_success() => {
                    return Err(TrackerError::Parse(format!(
                        "{} returned a non-JSON body: {e}",
                        request.path
                    )));
                }
                // Error pages are often HTML; keep the text for the message.
                Err(_) => Value::String(text),
            }
        };

        if !status.is_success() {
            warn!("{:?} {} returned {}", request.method, request.path, status);
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
            set_cookie,
        })
    }
}

fn build_form(parts: Vec<FormPart>) -> Result<Form, TrackerError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { name, upload } => {
                let file = Part::bytes(upload.bytes.to_vec())
                    .file_name(upload.file_name)
                    .mime_str(&upload.mime_type)?;
                form.part(name, file)
            }
        };
    }
    Ok(form)
}

/// Extracts `name=value` from a `Set-Cookie` header, dropping attributes.
fn cookie_pair(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    if name.trim().is_empty() || value.trim().is_empty() {
        return None;
    }
    Some(format!("{}={}", name.trim(), value.trim()))
}
