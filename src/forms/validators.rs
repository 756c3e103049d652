//! Field validators shared by the signup forms

use std::sync::OnceLock;
use regex::Regex;
use tracing::debug;
use crate::utils::helpers::format_bytes;
use super::value::FieldValue;

/// Largest accepted upload, 100 MB
pub const MAX_UPLOAD_BYTES: u64 = 104_857_600;

pub const MIN_AGE: f64 = 5.0;
pub const MAX_AGE: f64 = 125.0;
pub const MIN_PHONE_LENGTH: usize = 10;

/// Answer that counts as agreeing to a consent question
pub const CONSENT_YES: &str = "Yes";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

/// Any non-blank text
pub fn required_text(value: &FieldValue) -> bool {
    value.as_str().map_or(false, |text| !text.trim().is_empty())
}

/// Any answer at all
pub fn answered(value: &FieldValue) -> bool {
    value.is_answered()
}

/// At least a first and a last name
pub fn full_name(value: &FieldValue) -> bool {
    value
        .as_str()
        .map_or(false, |text| text.split_whitespace().count() >= 2)
}

pub fn email(value: &FieldValue) -> bool {
    value
        .as_str()
        .zip(email_regex())
        .map_or(false, |(text, pattern)| pattern.is_match(text.trim()))
}

/// At least ten characters once trimmed
pub fn phone_number(value: &FieldValue) -> bool {
    value
        .as_str()
        .map_or(false, |text| text.trim().chars().count() >= MIN_PHONE_LENGTH)
}

/// Numeric, 5 to 125 inclusive
pub fn age(value: &FieldValue) -> bool {
    value
        .as_number()
        .map_or(false, |age| (MIN_AGE..=MAX_AGE).contains(&age))
}

/// Numeric minutes, above zero and within `limit_minutes`
pub fn performance_length(value: &FieldValue, limit_minutes: u32) -> bool {
    value
        .as_number()
        .map_or(false, |minutes| minutes > 0.0 && minutes <= f64::from(limit_minutes))
}

/// An absolute URL with a host
pub fn link(value: &FieldValue) -> bool {
    value.as_str().map_or(false, |text| {
        url::Url::parse(text.trim())
            .map(|url| url.has_host())
            .unwrap_or(false)
    })
}

/// Checkbox that must be ticked
pub fn consent_given(value: &FieldValue) -> bool {
    value.as_str() == Some(CONSENT_YES)
}

/// Required upload within the size limit
pub fn required_upload(value: &FieldValue) -> bool {
    match value {
        FieldValue::Upload(file) => upload_size_ok(file.size_bytes),
        _ => false,
    }
}

fn upload_size_ok(size_bytes: u64) -> bool {
    let ok = size_bytes <= MAX_UPLOAD_BYTES;
    if !ok {
        debug!(
            size = %format_bytes(size_bytes),
            limit = %format_bytes(MAX_UPLOAD_BYTES),
            "Upload exceeds size limit"
        );
    }
    ok
}

/// At least one slot, and every slot inside the allowed window
pub fn time_slots(value: &FieldValue) -> bool {
    match value {
        FieldValue::TimeSlots(slots) => !slots.is_empty() && slots.iter().all(|slot| slot.is_valid()),
        _ => false,
    }
}

/// Exactly `size` filled-in entries
pub fn text_group(value: &FieldValue, size: usize) -> bool {
    match value {
        FieldValue::TextGroup(items) => {
            items.len() == size && items.iter().all(|item| !item.text.trim().is_empty())
        }
        _ => false,
    }
}
