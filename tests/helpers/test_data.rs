//! Test data helpers
//!
//! Sample sheet rows, events and filled-in forms shared by the integration tests.

use std::sync::Arc;
use serde_json::{json, Value};
use volunteer_signup::{
    forms::{catalog::field, FieldValue, FormController, FormRegistry},
    models::{Event, EventRow},
    services::{FormServices, FormTransport, MemoryStore, SubmissionLedger},
};

pub const LEDGER_KEY: &str = "submittedForms";

/// Five events, two of them at near-identical library locations
pub fn sample_rows() -> Value {
    json!([
        {
            "Title": "Library Music Hour",
            "Location": "Main St Library",
            "Date": "2024-05-01T15:00:00",
            "Image": "https://img.example/music-hour.png",
            "Description": "Play for families in the reading room",
            "Tags": "Music, Kids",
            "Form Link": "https://forms.example/music-hour"
        },
        {
            "Title": "Library Music Hour",
            "Location": "Park",
            "Date": "2024-05-01T10:00:00",
            "Image": "",
            "Description": "Outdoor edition",
            "Tags": "Music, Outdoors"
        },
        {
            "Title": "Dance Club",
            "Location": "Senior Center",
            "Date": "2024-05-10",
            "Image": "",
            "Description": "Lead a dance session",
            "Tags": "Dance, Seniors"
        },
        {
            "Title": "Request a Concert",
            "Location": "Main Street Library",
            "Date": "2024-06-01",
            "Image": "",
            "Description": "Host a concert at your venue",
            "Tags": "Music"
        },
        {
            "Title": "Music by the Tracks",
            "Location": "Union Station",
            "Date": "2024-06-15T12:00:00",
            "Image": "",
            "Description": "Busk for commuters",
            "Tags": "Music, Outdoors"
        }
    ])
}

pub fn sample_events() -> Vec<Event> {
    let rows: Vec<EventRow> = serde_json::from_value(sample_rows()).unwrap();
    rows.into_iter().filter_map(Event::from_row).collect()
}

pub fn memory_ledger() -> SubmissionLedger {
    SubmissionLedger::new(Arc::new(MemoryStore::new()), LEDGER_KEY)
}

pub fn services(transport: Arc<dyn FormTransport>, ledger: SubmissionLedger) -> FormServices {
    FormServices::new(Arc::new(FormRegistry::builtin()), transport, ledger)
        .with_support_email("volunteers@example.org")
}

/// Answer every music-performance question validly, as a solo act
pub fn fill_music_form(controller: &mut FormController, age: &str) {
    let answers = [
        (field::FULL_NAME, FieldValue::text("Ada Lovelace")),
        (field::EMAIL, FieldValue::text("ada@example.org")),
        (field::PHONE_NUMBER, FieldValue::text("555-123-4567")),
        (field::AGE, FieldValue::text(age)),
        (field::PERFORMANCE_TYPE, FieldValue::choice("Solo")),
        (field::INSTRUMENT, FieldValue::text("Violin")),
        (field::PIECES, FieldValue::text("Meditation from Thais")),
        (field::PERFORMANCE_LENGTH, FieldValue::text("6")),
        (field::RECORDING_LINK, FieldValue::text("https://youtu.be/abc123")),
        (field::PHOTO_RELEASE, FieldValue::choice("No")),
        (field::AGREEMENT, FieldValue::choice("Yes")),
    ];
    for (name, value) in answers {
        controller.set_value(name, value).unwrap();
    }
}
