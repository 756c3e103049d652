//! Form endpoint transport
//!
//! Posts an encoded answer payload to the external form backend as an
//! `application/x-www-form-urlencoded` body. Any 2xx response is a success.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use crate::config::settings::FormsConfig;
use crate::utils::errors::{Result, SubmissionError, SubmissionResult, VolunteerError};

/// Ordered `entry.{id}` answers for one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pub form_id: String,
    pub fields: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            fields: Vec::new(),
        }
    }

    /// Append `entry.{entry_id}={value}`
    pub fn push_entry(&mut self, entry_id: &str, value: impl Into<String>) {
        self.fields.push((format!("entry.{}", entry_id), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Url-encoded body, fields in insertion order joined by `&`
    pub fn to_body(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Delivers a payload to the form backend
#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn submit(&self, payload: &FormPayload) -> SubmissionResult<()>;
}

/// reqwest-backed transport for the hosted form service
#[derive(Debug, Clone)]
pub struct HttpFormTransport {
    client: Client,
    base_url: String,
}

impl HttpFormTransport {
    pub fn new(config: &FormsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("volunteer-signup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(VolunteerError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn response_url(&self, form_id: &str) -> String {
        format!("{}/{}/formResponse", self.base_url, form_id)
    }
}

#[async_trait]
impl FormTransport for HttpFormTransport {
    async fn submit(&self, payload: &FormPayload) -> SubmissionResult<()> {
        let url = self.response_url(&payload.form_id);
        debug!(url = %url, fields = payload.fields.len(), "Posting form response");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(payload.to_body())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmissionError::Timeout
                } else {
                    SubmissionError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Form endpoint rejected submission");
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(url = %url, status = status.as_u16(), "Form response accepted");
        Ok(())
    }
}
