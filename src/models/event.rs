//! Event model

use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use crate::utils::helpers::{parse_iso_datetime, split_comma_list};

/// Separator between the parts of a submission hash, chosen so it does not
/// occur in titles, locations or dates
pub const SUBMISSION_SEPARATOR: &str = "&&&";

/// One row as delivered by the spreadsheet source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Tags", default)]
    pub tags: String,
    #[serde(rename = "Form Link", default)]
    pub form_link: Option<String>,
}

/// A volunteer opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub location: String,
    /// `None` when the sheet's date cell could not be parsed
    pub date: Option<NaiveDateTime>,
    /// Date cell exactly as it came from the sheet
    pub raw_date: String,
    pub image: String,
    pub description: String,
    pub tags: Vec<String>,
    pub form_url: Option<String>,
    pub is_submitted: bool,
}

impl Event {
    /// Convert a sheet row, skipping rows without a title
    pub fn from_row(row: EventRow) -> Option<Self> {
        let title = row.title.trim().to_string();
        if title.is_empty() {
            return None;
        }

        let form_url = row
            .form_link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty());

        Some(Self {
            title,
            location: row.location.trim().to_string(),
            date: parse_iso_datetime(&row.date),
            raw_date: row.date,
            image: row.image.trim().to_string(),
            description: row.description,
            tags: split_comma_list(&row.tags),
            form_url,
            is_submitted: false,
        })
    }

    /// Calendar date as `YYYY-MM-DD`, falling back to the raw cell
    pub fn date_key(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => self.raw_date.trim().to_string(),
        }
    }

    /// Key under which a submission for this event is recorded
    pub fn submission_hash(&self) -> String {
        submission_hash(&self.title, &self.location, &self.date_key())
    }

    /// Location and date handed to the signup form for this event
    pub fn context(&self) -> EventContext {
        EventContext {
            location: self.location.clone(),
            date: self.date_key(),
        }
    }
}

/// Event metadata submitted alongside every form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

impl EventContext {
    pub fn new(location: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            date: date.into(),
        }
    }
}

/// Build the submission hash for a form title at a location and date
pub fn submission_hash(title: &str, location: &str, date: &str) -> String {
    [title, location, date].join(SUBMISSION_SEPARATOR)
}
