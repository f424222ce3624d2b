use chrono::{DateTime, FixedOffset, Utc};
use ics::{
    components::Property,
    escape_text,
    properties::{CalScale, Description, DtEnd, DtStart, Location, Summary},
    ICalendar,
};
use uuid::Uuid;

use crate::{Event, Schedule};

pub const PRODUCT_ID: &str = "-//hosh.io//Rust//EN";
pub const CALENDAR_NAME: &str = "Urban Kings Classes";
pub const CALENDAR_TIMEZONE: &str = "Europe/London";
pub const EVENT_DESCRIPTION: &str = "some description";
pub const EVENT_LOCATION: &str = "Urban Kings London";

/// A fresh random UID for every call.
pub fn random_uid() -> String {
    Uuid::new_v4().to_string()
}

fn format_utc(datetime: &DateTime<FixedOffset>) -> String {
    datetime
        .with_timezone(&Utc)
        .format("%Y%m%dT%H%M%SZ")
        .to_string()
}

impl Schedule {
    /// Builds the calendar with a random UID per event.
    #[must_use]
    pub fn to_ics(&self) -> ICalendar<'_> {
        self.to_ics_with(random_uid)
    }

    /// Builds the calendar, asking `next_uid` for each event's UID in order.
    pub fn to_ics_with<F>(&self, mut next_uid: F) -> ICalendar<'_>
    where
        F: FnMut() -> String,
    {
        let mut icalendar = ICalendar::new("2.0", PRODUCT_ID);
        icalendar.push(CalScale::new("GREGORIAN"));
        icalendar.push(Property::new("X-WR-CALNAME", CALENDAR_NAME));
        icalendar.push(Property::new("X-WR-TIMEZONE", CALENDAR_TIMEZONE));

        for event in &self.events {
            icalendar.add_event(event.to_ics(next_uid()));
        }

        icalendar
    }
}

impl Event {
    #[must_use]
    pub fn to_ics(&self, uid: String) -> ics::Event<'_> {
        let start = format_utc(&self.start);
        let end = format_utc(&self.end);

        // DTSTAMP mirrors DTSTART so identical schedules encode identically.
        let mut ics_event = ics::Event::new(uid, start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Description::new(EVENT_DESCRIPTION));
        ics_event.push(Summary::new(escape_text(self.class_name.as_str())));
        ics_event.push(Location::new(EVENT_LOCATION));

        ics_event
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn event(day: u32, start: u32, name: &str) -> Event {
        let offset = FixedOffset::east_opt(0).unwrap();
        Event {
            day_of_week: 0,
            start: offset.with_ymd_and_hms(2024, 5, day, start, 0, 0).unwrap(),
            end: offset.with_ymd_and_hms(2024, 5, day, start + 1, 0, 0).unwrap(),
            class_name: name.to_string(),
            class_url: None,
            instructor_name: String::new(),
            instructor_url: None,
            payg_open: false,
        }
    }

    fn counter() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("uid-{n}")
        }
    }

    fn lines(ics: &str) -> Vec<&str> {
        ics.split("\r\n").filter(|line| !line.is_empty()).collect()
    }

    #[test]
    fn calendar_properties() {
        let schedule = Schedule::from(vec![event(13, 8, "HIIT")]);
        let ics = schedule.to_ics_with(counter()).to_string();
        let lines = lines(&ics);

        assert_eq!(lines.first(), Some(&"BEGIN:VCALENDAR"));
        assert_eq!(lines.last(), Some(&"END:VCALENDAR"));
        for expected in [
            "VERSION:2.0",
            "PRODID:-//hosh.io//Rust//EN",
            "CALSCALE:GREGORIAN",
            "X-WR-CALNAME:Urban Kings Classes",
            "X-WR-TIMEZONE:Europe/London",
        ] {
            assert!(lines.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn event_properties() {
        let schedule = Schedule::from(vec![event(13, 8, "HIIT")]);
        let ics = schedule.to_ics_with(counter()).to_string();
        let lines = lines(&ics);

        let begin = lines.iter().position(|l| *l == "BEGIN:VEVENT").unwrap();
        let end = lines.iter().position(|l| *l == "END:VEVENT").unwrap();
        let vevent = &lines[begin + 1..end];

        for expected in [
            "UID:uid-1",
            "DTSTAMP:20240513T080000Z",
            "DTSTART:20240513T080000Z",
            "DTEND:20240513T090000Z",
            "DESCRIPTION:some description",
            "SUMMARY:HIIT",
            "LOCATION:Urban Kings London",
        ] {
            assert!(vevent.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn renders_instants_in_utc() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let mut shifted = event(13, 8, "Spin");
        shifted.start = offset.with_ymd_and_hms(2024, 5, 13, 0, 30, 0).unwrap();
        shifted.end = offset.with_ymd_and_hms(2024, 5, 13, 1, 30, 0).unwrap();

        let ics = Schedule::from(vec![shifted]).to_ics_with(counter()).to_string();
        assert!(ics.contains("DTSTART:20240512T233000Z\r\n"));
        assert!(ics.contains("DTEND:20240513T003000Z\r\n"));
    }

    #[test]
    fn one_uid_per_event() {
        let schedule = Schedule::from(vec![
            event(13, 8, "A"),
            event(14, 9, "B"),
            event(15, 10, "C"),
        ]);
        let ics = schedule.to_ics_with(counter()).to_string();

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 3);
        for uid in ["UID:uid-1\r\n", "UID:uid-2\r\n", "UID:uid-3\r\n"] {
            assert_eq!(ics.matches(uid).count(), 1);
        }
    }

    #[test]
    fn random_uids_differ_between_encodes() {
        let schedule = Schedule::from(vec![event(13, 8, "HIIT")]);
        let uid = |ics: String| {
            ics.split("\r\n")
                .find(|line| line.starts_with("UID:"))
                .map(str::to_string)
                .unwrap()
        };

        let first = uid(schedule.to_ics().to_string());
        let second = uid(schedule.to_ics().to_string());
        assert_ne!(first, second);
        assert_eq!(first.len(), "UID:".len() + 36);
    }

    #[test]
    fn deterministic_apart_from_uids() {
        let schedule = Schedule::from(vec![event(13, 8, "HIIT"), event(16, 18, "Boxing")]);
        let strip = |ics: String| {
            ics.split("\r\n")
                .filter(|line| !line.starts_with("UID:"))
                .collect::<Vec<_>>()
                .join("\r\n")
        };

        assert_eq!(
            strip(schedule.to_ics().to_string()),
            strip(schedule.to_ics().to_string())
        );
        assert_eq!(
            schedule.to_ics_with(counter()).to_string(),
            schedule.to_ics_with(counter()).to_string()
        );
    }

    #[test]
    fn escapes_text_values() {
        let schedule = Schedule::from(vec![event(13, 8, "Stretch, Core; Mobility")]);
        let ics = schedule.to_ics_with(counter()).to_string();

        assert!(ics.contains("SUMMARY:Stretch\\, Core\\; Mobility\r\n"));
    }

    #[test]
    fn folds_long_lines() {
        let name = "Strength and Conditioning for Absolute Beginners with Extra Long Title Words";
        let schedule = Schedule::from(vec![event(13, 8, name)]);
        let ics = schedule.to_ics_with(counter()).to_string();

        for line in ics.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {line:?}");
        }

        let unfolded = ics.replace("\r\n ", "").replace("\r\n\t", "");
        assert!(unfolded.contains(&format!("SUMMARY:{name}\r\n")));
    }

    #[test]
    fn empty_schedule_is_a_bare_calendar() {
        let ics = Schedule::default().to_ics_with(counter()).to_string();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(!ics.contains("VEVENT"));
    }
}
