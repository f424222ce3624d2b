use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use log::{debug, warn};
use once_cell::sync::Lazy;
use scraper::Selector;
use url::Url;

use crate::document::{parse_document, Node};
use crate::error::{Error, Result};
use crate::time::normalize;
use crate::{Event, Schedule};

macro_rules! selector {
    ($query:expr) => {{
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($query).unwrap());
        &SELECTOR
    }};
}

/// Maps the `id` of a timetable `<table>` to the weekday it lists (Monday = 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMapping(HashMap<String, u8>);

impl Default for TableMapping {
    fn default() -> Self {
        Self(
            (0..7u8)
                .map(|day| (format!("tablepress-{}", day + 1), day))
                .collect(),
        )
    }
}

impl TableMapping {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn insert<S: Into<String>>(&mut self, table_id: S, day_of_week: u8) -> Result<()> {
        let table_id = table_id.into();
        if day_of_week > 6 {
            return Err(Error::InvalidMapping(format!(
                "day {day_of_week} for table `{table_id}` is not in 0..=6"
            )));
        }

        self.0.insert(table_id, day_of_week);
        Ok(())
    }

    /// Builds a mapping from `ID=DAY` entries.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mapping = Self::empty();

        for entry in entries {
            let entry = entry.as_ref();
            let (table_id, day) = entry.split_once('=').ok_or_else(|| {
                Error::InvalidMapping(format!("`{entry}` is not of the form ID=DAY"))
            })?;

            let table_id = table_id.trim();
            if table_id.is_empty() {
                return Err(Error::InvalidMapping(format!("`{entry}` has an empty table id")));
            }

            let day = day
                .trim()
                .parse::<u8>()
                .map_err(|_| Error::InvalidMapping(format!("`{entry}` has a non-numeric day")))?;

            mapping.insert(table_id, day)?;
        }

        Ok(mapping)
    }

    pub fn day_of(&self, table_id: &str) -> Option<u8> {
        self.0.get(table_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn parse_schedule<S: AsRef<str>>(
    html: S,
    tables: &TableMapping,
    source: &Url,
    now: DateTime<FixedOffset>,
) -> Schedule {
    let html = parse_document(html);
    Schedule::from(extract_events(&html.root_element(), tables, source, now))
}

/// Collects one event per timetable row below `root`, in document order.
///
/// Rows are read by column position: start, end, class, instructor, PAYG.
/// Rows outside a mapped table are ignored and rows with unusable times are
/// dropped; neither stops the rest of the page from being read. Links are
/// checked against `source`, the page they were read from.
pub fn extract_events<N: Node>(
    root: &N,
    tables: &TableMapping,
    source: &Url,
    now: DateTime<FixedOffset>,
) -> Vec<Event> {
    let mut events = Vec::new();

    for row in root.find_all(selector!(".tablepress tbody tr")) {
        let Some(table_id) = row.closest("table").and_then(|table| table.attr("id")) else {
            debug!("Skipping timetable row outside an identified table");
            continue;
        };

        let Some(day_of_week) = tables.day_of(&table_id) else {
            debug!("Skipping row of unmapped table `{table_id}`");
            continue;
        };

        match parse_row(&row, day_of_week, source, now) {
            Ok(event) => events.push(event),
            Err(err) => warn!("Dropping row of table `{table_id}`: {err}"),
        }
    }

    events
}

fn parse_row<N: Node>(
    row: &N,
    day_of_week: u8,
    source: &Url,
    now: DateTime<FixedOffset>,
) -> Result<Event> {
    let text = |cell: &Option<N>| cell.as_ref().map(Node::trimmed_text).unwrap_or_default();

    let start_text = text(&first_cell(row, selector!("td.column-1")));
    let end_text = text(&first_cell(row, selector!("td.column-2")));
    let class = first_cell(row, selector!("td.column-3"));
    let instructor = first_cell(row, selector!("td.column-4"));
    let payg = text(&first_cell(row, selector!("td.column-5")));

    let start = normalize(&start_text, day_of_week, now)?;
    let end = normalize(&end_text, day_of_week, now)?;

    if start.date_naive() != end.date_naive() {
        debug!(
            "Class at {start_text} moved to {} by the hour correction",
            start.date_naive()
        );
    }

    if start >= end {
        return Err(Error::TimeRange {
            start: start_text,
            end: end_text,
        });
    }

    Ok(Event {
        day_of_week,
        start,
        end,
        class_name: text(&class),
        class_url: class.as_ref().and_then(|cell| single_link(cell, source)),
        instructor_name: text(&instructor),
        instructor_url: instructor.as_ref().and_then(|cell| single_link(cell, source)),
        payg_open: payg.to_lowercase() == "yes",
    })
}

fn first_cell<N: Node>(row: &N, selector: &Selector) -> Option<N> {
    row.find_all(selector).into_iter().next()
}

/// The href of the cell's only anchor, trimmed but otherwise as written.
/// Cells with no anchor, several anchors or an href that does not resolve
/// against `source` yield `None`.
fn single_link<N: Node>(cell: &N, source: &Url) -> Option<String> {
    let anchors = cell.find_all(selector!("a"));
    let [anchor] = anchors.as_slice() else {
        return None;
    };

    let href = anchor.attr("href")?;
    let href = href.trim();

    match Url::options().base_url(Some(source)).parse(href) {
        Ok(_) => Some(href.to_string()),
        Err(err) => {
            debug!("Ignoring link `{href}`: {err}");
            None
        }
    }
}
