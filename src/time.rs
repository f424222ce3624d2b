use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime};

use crate::error::{Error, Result};

/// Hours subtracted from every time read off the timetable page.
///
/// Times on the source page come out one hour ahead of the sessions they
/// describe. Nobody has confirmed whether that is a display-zone mismatch
/// upstream or a quirk of the page, so the shift is kept as-is.
pub const SOURCE_HOUR_CORRECTION: i64 = 1;

/// Monday of the week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday().into())
}

/// Anchors `text` to weekday `day_of_week` (Monday = 0) of the week containing `now`.
///
/// The returned timestamp carries the offset of `now`.
pub fn normalize(
    text: &str,
    day_of_week: u8,
    now: DateTime<FixedOffset>,
) -> Result<DateTime<FixedOffset>> {
    let date = week_monday(now.date_naive()) + Duration::days(day_of_week.into());
    let time = parse_time_of_day(text)?;

    let local = date.and_time(time) - Duration::hours(SOURCE_HOUR_CORRECTION);

    local
        .and_local_timezone(*now.offset())
        .single()
        .ok_or_else(|| Error::InvalidTime(text.to_string()))
}

/// Parses loosely written clock times such as `7:30am`, `7.30 PM`, `19:00` or `9`.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime> {
    let invalid = || Error::InvalidTime(text.to_string());

    let compact = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
        .replace("A.M.", "AM")
        .replace("P.M.", "PM")
        .replace('.', ":");

    let (clock, pm) = match compact.strip_suffix("AM") {
        Some(clock) => (clock, Some(false)),
        None => match compact.strip_suffix("PM") {
            Some(clock) => (clock, Some(true)),
            None => (compact.as_str(), None),
        },
    };

    let mut fields = [0u32; 3];
    let mut count = 0;
    for part in clock.split(':') {
        if count == fields.len() || part.is_empty() || part.len() > 2 {
            return Err(invalid());
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        fields[count] = part.parse().map_err(|_| invalid())?;
        count += 1;
    }

    let [mut hour, minute, second] = fields;

    if let Some(pm) = pm {
        if !(1..=12).contains(&hour) {
            return Err(invalid());
        }
        hour %= 12;
        if pm {
            hour += 12;
        }
    }

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)
}
