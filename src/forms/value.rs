//! Field values held by a form

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use super::time_slot::TimeSlot;

/// Joiner for answers with several parts
pub const LIST_SEPARATOR: &str = ", ";

/// A file picked for an upload question; the upload itself happens elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    /// Where the uploaded copy lives, once known
    pub url: Option<String>,
}

/// One entry of a fixed-size text group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupItem {
    pub id: Uuid,
    pub text: String,
}

impl GroupItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }
}

/// Current answer to a question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    /// Label of the selected option
    Choice(String),
    /// Labels of every selected option
    Choices(Vec<String>),
    Upload(UploadedFile),
    TimeSlots(Vec<TimeSlot>),
    TextGroup(Vec<GroupItem>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn choice(label: impl Into<String>) -> Self {
        FieldValue::Choice(label.into())
    }

    pub fn text_group<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::TextGroup(items.into_iter().map(GroupItem::new).collect())
    }

    /// Text or selected label
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) | FieldValue::Choice(text) => Some(text),
            _ => None,
        }
    }

    /// Parse a text answer as a finite number
    pub fn as_number(&self) -> Option<f64> {
        self.as_str()
            .and_then(|text| text.trim().parse::<f64>().ok())
            .filter(|number| number.is_finite())
    }

    /// Whether the user has given any answer at all
    pub fn is_answered(&self) -> bool {
        match self {
            FieldValue::Empty => false,
            FieldValue::Text(text) | FieldValue::Choice(text) => !text.trim().is_empty(),
            FieldValue::Choices(labels) => !labels.is_empty(),
            FieldValue::Upload(_) => true,
            FieldValue::TimeSlots(slots) => !slots.is_empty(),
            FieldValue::TextGroup(items) => items.iter().any(|item| !item.text.trim().is_empty()),
        }
    }

    /// Text sent to the form backend; multi-part answers are joined with ", "
    pub fn encode(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(text) | FieldValue::Choice(text) => text.clone(),
            FieldValue::Choices(labels) => labels.join(LIST_SEPARATOR),
            FieldValue::Upload(file) => file.url.clone().unwrap_or_else(|| file.name.clone()),
            FieldValue::TimeSlots(slots) => slots
                .iter()
                .map(TimeSlot::encode)
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            FieldValue::TextGroup(items) => items
                .iter()
                .map(|item| item.text.trim())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
        }
    }
}

static EMPTY: FieldValue = FieldValue::Empty;

/// Answers keyed by question name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormValues {
    values: HashMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current answer, [`FieldValue::Empty`] when never set
    pub fn get(&self, name: &str) -> &FieldValue {
        self.values.get(name).unwrap_or(&EMPTY)
    }

    /// Store an answer, returning the previous one
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> FieldValue {
        self.values.insert(name.into(), value).unwrap_or_default()
    }

    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }
}
