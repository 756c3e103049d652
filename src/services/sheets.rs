//! Spreadsheet-backed event source
//!
//! Fetches the JSON row array for the configured sheet and turns it into
//! [`Event`]s. A failed fetch never reaches the caller as an error; the
//! event list is simply empty.

use std::time::Duration;
use reqwest::Client;
use tracing::{debug, info};
use crate::config::settings::SheetConfig;
use crate::models::event::{Event, EventRow};
use crate::utils::errors::{Result, VolunteerError};
use crate::utils::logging::log_api_error;

#[derive(Debug, Clone)]
pub struct SheetClient {
    client: Client,
    config: SheetConfig,
}

impl SheetClient {
    pub fn new(config: SheetConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(VolunteerError::Http)?;

        Ok(Self { client, config })
    }

    /// `{base_url}/{spreadsheet_id}/{sheet_name}`
    pub fn rows_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.spreadsheet_id,
            urlencoding::encode(&self.config.sheet_name)
        )
    }

    /// Raw rows, errors propagated
    pub async fn fetch_rows(&self) -> Result<Vec<EventRow>> {
        let url = self.rows_url();
        debug!(url = %url, "Fetching event rows");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VolunteerError::InvalidInput(format!(
                "Sheet source returned HTTP {}",
                status
            )));
        }

        Ok(response.json::<Vec<EventRow>>().await?)
    }

    /// Events in sheet order; empty on any failure
    pub async fn fetch_events(&self) -> Vec<Event> {
        match self.fetch_rows().await {
            Ok(rows) => {
                let total = rows.len();
                let events: Vec<Event> = rows.into_iter().filter_map(Event::from_row).collect();
                info!(rows = total, events = events.len(), sheet = %self.config.sheet_name, "Events loaded");
                events
            }
            Err(e) => {
                log_api_error("sheet", &e.to_string(), Some(&self.config.sheet_name));
                Vec::new()
            }
        }
    }
}
