//! Serves a gym's weekly HTML timetable as an iCalendar feed.
//!
//! The page is fetched on every request, each `tablepress` row becomes an
//! [`Event`] anchored to the current week, and the result is rendered with
//! the `ics` crate.

mod config;
mod document;
mod error;
mod ics;
mod parser;
mod proxy;
mod server;
mod structs;
mod time;

pub use config::{Config, DEFAULT_FETCH_TIMEOUT, DEFAULT_SOURCE_URL};
pub use document::{parse_document, Node};
pub use error::{Error, Result};
pub use parser::{extract_events, parse_schedule, TableMapping};
pub use proxy::Proxy;
pub use server::{router, serve, CALENDAR_PATH};
pub use structs::{Event, Schedule};
pub use time::{normalize, parse_time_of_day, week_monday, SOURCE_HOUR_CORRECTION};

pub mod calendar {
    pub use crate::ics::{
        random_uid, CALENDAR_NAME, CALENDAR_TIMEZONE, EVENT_DESCRIPTION, EVENT_LOCATION, PRODUCT_ID,
    };
}
