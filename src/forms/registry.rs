//! Form id lookup table
//!
//! Maps a form title to the backend form id and the entry id of every field.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::utils::errors::{Result, VolunteerError};
use super::catalog::{field, FormVariant};

/// Backend identifiers for one form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormIds {
    pub form_id: String,
    pub location_entry: String,
    pub date_entry: String,
    /// Entry id per question name
    #[serde(default)]
    pub entries: HashMap<String, String>,
}

impl FormIds {
    pub fn new(form_id: impl Into<String>, location_entry: impl Into<String>, date_entry: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            location_entry: location_entry.into(),
            date_entry: date_entry.into(),
            entries: HashMap::new(),
        }
    }

    pub fn with_entry(mut self, question: impl Into<String>, entry_id: impl Into<String>) -> Self {
        self.entries.insert(question.into(), entry_id.into());
        self
    }

    pub fn entry_for(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(String::as_str)
    }
}

/// Static table of every known form, keyed by title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRegistry {
    #[serde(flatten)]
    forms: HashMap<String, FormIds>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from TOML, one `["Form Title"]` table per form
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|e| VolunteerError::Config(format!("Invalid form registry: {}", e)))
    }

    pub fn insert(&mut self, title: impl Into<String>, ids: FormIds) {
        self.forms.insert(title.into(), ids);
    }

    pub fn with_form(mut self, title: impl Into<String>, ids: FormIds) -> Self {
        self.insert(title, ids);
        self
    }

    pub fn get(&self, title: &str) -> Option<&FormIds> {
        self.forms.get(title)
    }

    /// Like [`get`](Self::get), but an unknown title is a configuration error
    pub fn lookup(&self, title: &str) -> Result<&FormIds> {
        self.get(title).ok_or_else(|| VolunteerError::UnknownForm {
            title: title.to_string(),
        })
    }

    pub fn contains(&self, title: &str) -> bool {
        self.forms.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// The forms currently published by the volunteer program
    pub fn builtin() -> Self {
        let music_hour = FormIds::new(
            "1FAIpQLSfLmH7xq2Vb0YpJw3nR8kTz5cQeUa9dGhN4sXoKv6iMyB1rLw",
            "1204918532",
            "836411209",
        )
        .with_entry(field::FULL_NAME, "2005620554")
        .with_entry(field::EMAIL, "1045781291")
        .with_entry(field::PHONE_NUMBER, "1166974658")
        .with_entry(field::AGE, "839337160")
        .with_entry(field::PARENTAL_CONSENT, "1570227734")
        .with_entry(field::PERFORMANCE_TYPE, "1065046570")
        .with_entry(field::INSTRUMENT, "1386102233")
        .with_entry(field::PIECES, "2098723146")
        .with_entry(field::PERFORMANCE_LENGTH, "417356783")
        .with_entry(field::RECORDING_LINK, "1938542519")
        .with_entry(field::ENSEMBLE_ROSTER, "744029583")
        .with_entry(field::PHOTO_RELEASE, "1517303101")
        .with_entry(field::AGREEMENT, "996247362");

        let tracks = FormIds::new(
            "1FAIpQLSeR4wKp0Tn8cVbZ2mLq7yXu3jHd9sGf5aEo1iNkB6tMhPz0Qg",
            "1722085013",
            "271650188",
        )
        .with_entry(field::FULL_NAME, "1488390146")
        .with_entry(field::EMAIL, "574025338")
        .with_entry(field::PHONE_NUMBER, "1329758462")
        .with_entry(field::AGE, "905313577")
        .with_entry(field::PARENTAL_CONSENT, "1842396015")
        .with_entry(field::PERFORMANCE_TYPE, "663195720")
        .with_entry(field::INSTRUMENT, "1213870394")
        .with_entry(field::PIECES, "350981648")
        .with_entry(field::PERFORMANCE_LENGTH, "1900452377")
        .with_entry(field::RECORDING_LINK, "128440169")
        .with_entry(field::PHOTO_RELEASE, "1634001285")
        .with_entry(field::AGREEMENT, "482679013");

        let concert = FormIds::new(
            "1FAIpQLSc8yNq1Zr5WkD3vHx0pBt7LmJe2uGa6sQo9fKi4RbT1nXwVdA",
            "1093286742",
            "558102934",
        )
        .with_entry(field::FULL_NAME, "1750418263")
        .with_entry(field::EMAIL, "301947586")
        .with_entry(field::PHONE_NUMBER, "1421930577")
        .with_entry(field::ORGANIZATION, "889264013")
        .with_entry(field::VENUE_ADDRESS, "1276540198")
        .with_entry(field::AUDIENCE_SIZE, "64420917")
        .with_entry(field::TIME_SLOTS, "1987302245")
        .with_entry(field::MUSIC_PREFERENCES, "730185642")
        .with_entry(field::NOTES, "1158823970");

        let dance = FormIds::new(
            "1FAIpQLSdT2bWq9Ys4NkX7hLm0Vc3pRa8uJe5Gz1oFi6KtB9sDnQwHvE",
            "1380512964",
            "927163054",
        )
        .with_entry(field::FULL_NAME, "1602748135")
        .with_entry(field::EMAIL, "215089376")
        .with_entry(field::PHONE_NUMBER, "1847362019")
        .with_entry(field::AGE, "490125873")
        .with_entry(field::PARENTAL_CONSENT, "1319087456")
        .with_entry(field::DANCE_STYLE, "772950318")
        .with_entry(field::FAVORITE_SONGS, "1094837261")
        .with_entry(field::PERFORMANCE_LENGTH, "1523640987")
        .with_entry(field::AGREEMENT, "360718245");

        Self::new()
            .with_form(FormVariant::LibraryMusicHour.title(), music_hour)
            .with_form(FormVariant::MusicByTheTracks.title(), tracks)
            .with_form(FormVariant::RequestConcert.title(), concert)
            .with_form(FormVariant::DanceClub.title(), dance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_builtin_covers_every_variant_question() {
        let registry = FormRegistry::builtin();
        for variant in FormVariant::ALL {
            let ids = registry.lookup(variant.title()).unwrap();
            for question in variant.questions() {
                assert!(
                    ids.entry_for(question.name()).is_some(),
                    "{} is missing an entry id for {}",
                    variant.title(),
                    question.name()
                );
            }
        }
    }

    #[test]
    fn test_unknown_title() {
        let registry = FormRegistry::builtin();
        assert_matches!(
            registry.lookup("Bake Sale"),
            Err(VolunteerError::UnknownForm { title }) if title == "Bake Sale"
        );
    }

    #[test]
    fn test_from_toml() {
        let raw = r#"
            ["Library Music Hour"]
            form_id = "abc"
            location_entry = "1"
            date_entry = "2"

            ["Library Music Hour".entries]
            fullName = "3"
        "#;
        let registry = FormRegistry::from_toml(raw).unwrap();
        let ids = registry.get("Library Music Hour").unwrap();
        assert_eq!(ids.form_id, "abc");
        assert_eq!(ids.entry_for("fullName"), Some("3"));
        assert_eq!(ids.entry_for("age"), None);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert_matches!(FormRegistry::from_toml("not = [valid"), Err(VolunteerError::Config(_)));
    }
}
