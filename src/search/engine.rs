//! Event filter engine
//!
//! Turns the full event list plus the applied [`FilterCriteria`] into the list
//! the UI shows. Location, date range and tags are hard filters; the name
//! query only ranks and narrows what the hard filters let through.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};
use crate::config::FilterConfig;
use crate::models::{Event, FilterCriteria, FilterState};
use crate::utils::logging::log_filter_applied;
use super::fuzzy;

/// Choices offered on the filter screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub tags: Vec<String>,
}

/// Derive the deduplicated location and tag choices from a dataset
pub fn filter_options(events: &[Event], config: &FilterConfig) -> FilterOptions {
    let locations: Vec<&str> = events
        .iter()
        .map(|event| event.location.as_str())
        .filter(|location| !location.trim().is_empty())
        .collect();
    let tags: Vec<&str> = events
        .iter()
        .flat_map(|event| event.tags.iter().map(String::as_str))
        .collect();

    FilterOptions {
        locations: fuzzy::dedupe(&locations, config.location_dedupe_threshold),
        tags: fuzzy::dedupe(&tags, config.tag_dedupe_threshold),
    }
}

/// Whether an event survives every hard filter
pub fn passes_hard_filters(event: &Event, criteria: &FilterCriteria, config: &FilterConfig) -> bool {
    if let Some(location) = criteria.location.as_deref() {
        if !fuzzy::matches(&[event.location.as_str()], location, config.match_threshold) {
            return false;
        }
    }

    if !criteria.date_range.is_unbounded() {
        match event.date {
            Some(date) if criteria.date_range.contains(date.date()) => {}
            _ => return false,
        }
    }

    criteria
        .tags
        .iter()
        .all(|tag| fuzzy::matches(&event.tags, tag, config.match_threshold))
}

/// Compute the visible events for `criteria`
///
/// Pure: the result depends only on the arguments.
pub fn apply(events: &[Event], criteria: &FilterCriteria, config: &FilterConfig) -> Vec<Event> {
    let hard_filtered: Vec<&Event> = events
        .iter()
        .filter(|event| passes_hard_filters(event, criteria, config))
        .collect();

    let query = criteria.name_query.trim();
    if query.is_empty() {
        return hard_filtered.into_iter().cloned().collect();
    }

    let titled: Vec<(usize, &str)> = hard_filtered
        .iter()
        .enumerate()
        .map(|(index, event)| (index, event.title.as_str()))
        .collect();

    fuzzy::rank(&titled, query, config.match_threshold)
        .into_iter()
        .map(|index| hard_filtered[index].clone())
        .collect()
}

/// Distinct criteria whose results are kept per dataset
const CACHE_CAPACITY: usize = 32;

/// Holds the current dataset, memoizes filter results per criteria and
/// publishes the visible list to subscribers
#[derive(Debug)]
pub struct FilterEngine {
    config: FilterConfig,
    events: Arc<Vec<Event>>,
    options: FilterOptions,
    criteria: FilterCriteria,
    cache: HashMap<FilterCriteria, Arc<Vec<Event>>>,
    /// Insertion order of `cache`, oldest first
    cache_order: VecDeque<FilterCriteria>,
    visible_tx: watch::Sender<Arc<Vec<Event>>>,
}

impl FilterEngine {
    /// Create an engine with an empty dataset
    pub fn new(config: FilterConfig) -> Self {
        let (visible_tx, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            config,
            events: Arc::new(Vec::new()),
            options: FilterOptions::default(),
            criteria: FilterCriteria::default(),
            cache: HashMap::new(),
            cache_order: VecDeque::new(),
            visible_tx,
        }
    }

    /// Receive the visible list every time it changes
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Event>>> {
        self.visible_tx.subscribe()
    }

    /// Replace the dataset wholesale and recompute under the current criteria
    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = Arc::new(events);
        self.options = filter_options(&self.events, &self.config);
        self.cache.clear();
        self.cache_order.clear();
        info!(
            events = self.events.len(),
            locations = self.options.locations.len(),
            tags = self.options.tags.len(),
            "Event dataset replaced"
        );
        let criteria = self.criteria.clone();
        self.recompute(criteria);
    }

    /// Filter by the applied half of `state`; the draft is never read
    pub fn apply_state(&mut self, state: &FilterState) -> Arc<Vec<Event>> {
        self.apply_criteria(state.applied().clone())
    }

    /// Filter by `criteria`, reusing a cached result when available
    pub fn apply_criteria(&mut self, criteria: FilterCriteria) -> Arc<Vec<Event>> {
        self.recompute(criteria)
    }

    fn recompute(&mut self, criteria: FilterCriteria) -> Arc<Vec<Event>> {
        let (visible, cached) = match self.cache.get(&criteria) {
            Some(hit) => (Arc::clone(hit), true),
            None => {
                let computed = Arc::new(apply(&self.events, &criteria, &self.config));
                self.remember(criteria.clone(), Arc::clone(&computed));
                (computed, false)
            }
        };
        log_filter_applied(self.events.len(), visible.len(), cached);

        self.criteria = criteria;
        let changed = self.visible_tx.send_if_modified(|current| {
            if **current == *visible {
                false
            } else {
                *current = Arc::clone(&visible);
                true
            }
        });
        if changed {
            debug!(visible = visible.len(), "Visible events changed");
        }
        visible
    }

    fn remember(&mut self, criteria: FilterCriteria, visible: Arc<Vec<Event>>) {
        while self.cache_order.len() >= CACHE_CAPACITY {
            match self.cache_order.pop_front() {
                Some(oldest) => {
                    self.cache.remove(&oldest);
                }
                None => break,
            }
        }
        self.cache_order.push_back(criteria.clone());
        self.cache.insert(criteria, visible);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Currently visible events
    pub fn visible(&self) -> Arc<Vec<Event>> {
        Arc::clone(&self.visible_tx.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::EventRow;

    fn event(title: &str, location: &str, date: &str, tags: &str) -> Event {
        Event::from_row(EventRow {
            title: title.to_string(),
            location: location.to_string(),
            date: date.to_string(),
            tags: tags.to_string(),
            ..EventRow::default()
        })
        .unwrap()
    }

    fn dataset() -> Vec<Event> {
        vec![
            event("Library Music Hour", "Main St Library", "2024-05-01T15:00:00", "Music, Kids"),
            event("Music by the Tracks", "Union Station", "2024-05-03T12:00:00", "Music, Outdoors"),
            event("Dance Club", "Senior Center", "2024-05-10", "Dance"),
            event("Request a Concert", "Main Street Library", "2024-06-01", "Music"),
            event("Garden Day", "Riverside Park", "not a date", "Outdoors, Kids"),
        ]
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_options_are_deduplicated() {
        let options = filter_options(&dataset(), &FilterConfig::default());
        assert_eq!(
            options.locations,
            vec!["Main St Library", "Union Station", "Senior Center", "Riverside Park"]
        );
        assert_eq!(options.tags, vec!["Music", "Kids", "Outdoors", "Dance"]);
    }

    #[test]
    fn test_empty_criteria_keeps_everything_in_order() {
        let events = dataset();
        let visible = apply(&events, &FilterCriteria::default(), &FilterConfig::default());
        assert_eq!(visible, events);
    }

    #[test]
    fn test_location_filter_includes_near_duplicates() {
        let criteria = FilterCriteria::new().with_location("Main St Library");
        let visible = apply(&dataset(), &criteria, &FilterConfig::default());
        let titles: Vec<&str> = visible.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Library Music Hour", "Request a Concert"]);
    }

    #[test]
    fn test_tags_use_and_semantics() {
        let criteria = FilterCriteria::new().with_tags(["Music", "Kids"]);
        let visible = apply(&dataset(), &criteria, &FilterConfig::default());
        let titles: Vec<&str> = visible.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Library Music Hour"]);
    }

    #[test]
    fn test_date_range_is_inclusive_and_rejects_bad_dates() {
        let criteria = FilterCriteria::new().with_date_range(Some(day(5, 1)), Some(day(5, 10)));
        let visible = apply(&dataset(), &criteria, &FilterConfig::default());
        let titles: Vec<&str> = visible.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Library Music Hour", "Music by the Tracks", "Dance Club"]);

        let open_end = FilterCriteria::new().with_date_range(Some(day(5, 10)), None);
        let visible = apply(&dataset(), &open_end, &FilterConfig::default());
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|e| e.title != "Garden Day"));
    }

    #[test]
    fn test_name_query_ranks_and_narrows() {
        let criteria = FilterCriteria::new().with_name_query("music");
        let visible = apply(&dataset(), &criteria, &FilterConfig::default());
        let titles: Vec<&str> = visible.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Library Music Hour", "Music by the Tracks"]);
    }

    #[test]
    fn test_engine_memoizes_and_notifies() {
        let mut engine = FilterEngine::new(FilterConfig::default());
        let mut rx = engine.subscribe();
        engine.set_events(dataset());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 5);

        let criteria = FilterCriteria::new().with_tag("Dance");
        let first = engine.apply_criteria(criteria.clone());
        let second = engine.apply_criteria(criteria);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(rx.borrow_and_update().len(), 1);

        // same output again: no notification
        engine.apply_criteria(FilterCriteria::new().with_tag("Dance"));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_engine_cache_is_bounded() {
        let mut engine = FilterEngine::new(FilterConfig::default());
        engine.set_events(dataset());

        for i in 0..CACHE_CAPACITY * 3 {
            engine.apply_criteria(FilterCriteria::new().with_name_query(format!("query {}", i)));
            assert!(engine.cache.len() <= CACHE_CAPACITY);
            assert_eq!(engine.cache.len(), engine.cache_order.len());
        }
        assert_eq!(engine.cache.len(), CACHE_CAPACITY);

        // oldest entries were evicted, newest kept
        let oldest = FilterCriteria::new().with_name_query("query 0");
        let newest = FilterCriteria::new().with_name_query(format!("query {}", CACHE_CAPACITY * 3 - 1));
        assert!(!engine.cache.contains_key(&oldest));
        assert!(engine.cache.contains_key(&newest));

        // a new dataset starts from an empty cache
        engine.set_events(dataset());
        assert_eq!(engine.cache.len(), 1);
    }

    #[test]
    fn test_engine_ignores_draft() {
        let mut engine = FilterEngine::new(FilterConfig::default());
        engine.set_events(dataset());
        let mut state = FilterState::new();

        state.edit_draft(|draft| draft.location = Some("Senior Center".to_string()));
        assert_eq!(engine.apply_state(&state).len(), 5);

        state.apply();
        assert_eq!(engine.apply_state(&state).len(), 1);
    }

    #[test]
    fn test_empty_dataset() {
        let mut engine = FilterEngine::new(FilterConfig::default());
        engine.set_events(Vec::new());
        let visible = engine.apply_criteria(FilterCriteria::new().with_name_query("music"));
        assert!(visible.is_empty());
        assert!(engine.options().locations.is_empty());
    }
}
