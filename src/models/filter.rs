//! Filter criteria model

use std::collections::BTreeSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar date range, open on any unset side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Everything the user can filter the event list by
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub name_query: String,
    pub location: Option<String>,
    /// Every selected tag must match (AND)
    pub tags: BTreeSet<String>,
    pub date_range: DateRange,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_query(mut self, query: impl Into<String>) -> Self {
        self.name_query = query.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = DateRange::new(start, end);
        self
    }

    /// True when no criterion restricts the list
    pub fn is_empty(&self) -> bool {
        self.name_query.trim().is_empty()
            && self.location.is_none()
            && self.tags.is_empty()
            && self.date_range.is_unbounded()
    }
}

/// Draft criteria being edited on the filter screen, and the applied
/// criteria the visible list is computed from
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    draft: FilterCriteria,
    applied: FilterCriteria,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &FilterCriteria {
        &self.draft
    }

    /// The only criteria filtering ever reads
    pub fn applied(&self) -> &FilterCriteria {
        &self.applied
    }

    /// Mutate the draft; the applied criteria stay untouched
    pub fn edit_draft<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut FilterCriteria),
    {
        edit(&mut self.draft);
    }

    /// Commit the draft. Returns whether the applied criteria changed.
    pub fn apply(&mut self) -> bool {
        if self.applied == self.draft {
            return false;
        }
        self.applied = self.draft.clone();
        true
    }

    /// Throw away unapplied edits
    pub fn reset_draft(&mut self) {
        self.draft = self.applied.clone();
    }

    /// Clear both copies. Returns whether the applied criteria changed.
    pub fn clear(&mut self) -> bool {
        self.draft = FilterCriteria::default();
        self.apply()
    }

    pub fn has_pending_changes(&self) -> bool {
        self.draft != self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(Some(day(1)), Some(day(3)));
        assert!(range.contains(day(1)));
        assert!(range.contains(day(3)));
        assert!(!range.contains(day(4)));
        assert!(DateRange::default().contains(day(20)));
    }

    #[test]
    fn test_draft_edits_do_not_touch_applied() {
        let mut state = FilterState::new();
        state.edit_draft(|draft| draft.location = Some("Park".to_string()));

        assert!(state.applied().location.is_none());
        assert!(state.has_pending_changes());

        assert!(state.apply());
        assert_eq!(state.applied().location.as_deref(), Some("Park"));
        assert!(!state.apply());
    }

    #[test]
    fn test_reset_and_clear() {
        let mut state = FilterState::new();
        state.edit_draft(|draft| {
            draft.tags.insert("Music".to_string());
        });
        state.apply();
        state.edit_draft(|draft| draft.name_query = "piano".to_string());
        state.reset_draft();
        assert_eq!(state.draft(), state.applied());

        assert!(state.clear());
        assert!(state.applied().is_empty());
    }
}
