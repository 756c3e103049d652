//! Mock form backend and sheet source for testing
//!
//! A single wiremock server plays both the sheet-to-JSON service and the
//! hosted form endpoint.

use std::time::Duration;
use serde_json::Value;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};
use volunteer_signup::config::{FormsConfig, SheetConfig};

pub const SPREADSHEET_ID: &str = "test-spreadsheet";
pub const SHEET_NAME: &str = "Events";

pub struct FormMockServer {
    pub server: MockServer,
}

impl FormMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn forms_config(&self, timeout_seconds: u64) -> FormsConfig {
        FormsConfig {
            base_url: self.server.uri(),
            timeout_seconds,
            support_email: "volunteers@example.org".to_string(),
        }
    }

    pub fn sheet_config(&self) -> SheetConfig {
        SheetConfig {
            base_url: self.server.uri(),
            spreadsheet_id: SPREADSHEET_ID.to_string(),
            sheet_name: SHEET_NAME.to_string(),
            timeout_seconds: 5,
        }
    }

    /// Answer form posts for `form_id` with `status`
    pub async fn mock_form_response(&self, form_id: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/formResponse", form_id)))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answer form posts only after `delay`
    pub async fn mock_slow_form_response(&self, form_id: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(format!("/{}/formResponse", form_id)))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Serve `rows` as the event sheet
    pub async fn mock_sheet(&self, rows: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/{}", SPREADSHEET_ID, SHEET_NAME)))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_sheet_error(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/{}", SPREADSHEET_ID, SHEET_NAME)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every form post received so far
    pub async fn form_bodies(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.method.as_str() == "POST")
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}
