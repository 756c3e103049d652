//! Concert time slots

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Earliest start time of day for a requested concert
pub const EARLIEST_START: (u32, u32) = (10, 30);
/// Latest start time of day for a requested concert
pub const LATEST_START: (u32, u32) = (17, 0);
/// Latest end time of day for a requested concert
pub const LATEST_END: (u32, u32) = (18, 0);

fn time_of_day((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// One requested concert slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSlot {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
        }
    }

    /// Starts before it ends, starts between 10:30 and 17:00, ends by 18:00
    pub fn is_valid(&self) -> bool {
        let start = self.start.time();
        let end = self.end.time();

        self.start < self.end
            && start >= time_of_day(EARLIEST_START)
            && start <= time_of_day(LATEST_START)
            && end <= time_of_day(LATEST_END)
    }

    /// Text sent to the form backend
    pub fn encode(&self) -> String {
        if self.start.date() == self.end.date() {
            format!(
                "{} {}-{}",
                self.start.format("%Y-%m-%d"),
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            )
        } else {
            format!(
                "{} - {}",
                self.start.format("%Y-%m-%d %H:%M"),
                self.end.format("%Y-%m-%d %H:%M")
            )
        }
    }
}
