use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// All classes found on the timetable page for the current week, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub events: Vec<Event>,
}

/// A single class occurrence.
///
/// `start` and `end` share the calendar date `monday + day_of_week`, and
/// `start < end` holds for every event produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Monday is 0.
    pub day_of_week: u8,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub class_name: String,
    /// The href exactly as written on the page, relative or not.
    pub class_url: Option<String>,
    pub instructor_name: String,
    pub instructor_url: Option<String>,
    pub payg_open: bool,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<Event>> for Schedule {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}
