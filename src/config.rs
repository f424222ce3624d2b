use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

use crate::parser::TableMapping;

pub const DEFAULT_SOURCE_URL: &str = "http://urbankingsgym.com/timetable/";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    /// Page holding the weekly timetable tables.
    pub source_url: String,
    pub fetch_timeout: Duration,
    pub tables: TableMapping,
    /// Zone that "now" and all class times are read in.
    pub utc_offset: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            tables: TableMapping::default(),
            utc_offset: Utc.fix(),
        }
    }
}
