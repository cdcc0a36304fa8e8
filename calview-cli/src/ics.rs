//! Reading appointments from .ics files using the icalendar crate's parser.

use std::path::Path;

use anyhow::Result;
use calview_core::Appointment;
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{read_calendar, unfold},
};
use tracing::warn;

/// Parse the first VEVENT of ICS content into an Appointment
pub fn parse_appointment(content: &str) -> Option<Appointment> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| "(No title)".to_string());

    let (start, all_day) = to_naive(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(|dpt| to_naive(dpt).0)
        .unwrap_or_else(|| {
            if all_day {
                start + Duration::days(1)
            } else {
                start
            }
        });

    let mut appointment = Appointment::new(title, start, end);
    appointment.all_day = all_day;
    appointment.uid = vevent.find_prop("UID").map(|p| p.val.to_string());
    appointment.description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());
    appointment.location = vevent.find_prop("LOCATION").map(|p| p.val.to_string());
    appointment.created_by = vevent.find_prop("ORGANIZER").map(|p| strip_mailto(p.val.as_ref()));
    appointment.attendees = vevent
        .properties
        .iter()
        .filter(|p| p.name == "ATTENDEE")
        .map(|p| strip_mailto(p.val.as_ref()))
        .collect();
    // Confidential events are shown but not editable
    appointment.read_only = vevent
        .find_prop("CLASS")
        .is_some_and(|p| p.val == "CONFIDENTIAL");

    Some(appointment)
}

/// Load every parsable .ics file in `dir`, in file name order
pub fn load_appointments(dir: &Path) -> Result<Vec<Appointment>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "ics"))
        .collect();
    paths.sort();

    let mut appointments = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(&path)?;
        match parse_appointment(&content) {
            Some(appointment) => appointments.push(appointment),
            None => warn!(path = %path.display(), "skipping unparsable .ics file"),
        }
    }

    Ok(appointments)
}

/// Convert icalendar's DatePerhapsTime to local wall-clock time.
/// Returns whether the value was a plain date (all-day).
fn to_naive(dpt: DatePerhapsTime) -> (NaiveDateTime, bool) {
    match dpt {
        DatePerhapsTime::Date(d) => (d.and_time(NaiveTime::MIN), true),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => (dt.with_timezone(&Local).naive_local(), false),
            CalendarDateTime::Floating(naive) => (naive, false),
            CalendarDateTime::WithTimezone { date_time, .. } => (date_time, false),
        },
    }
}

fn strip_mailto(value: &str) -> String {
    value
        .strip_prefix("mailto:")
        .or_else(|| value.strip_prefix("MAILTO:"))
        .unwrap_or(value)
        .to_string()
}
