//! Appointments shown by calendar views.
//!
//! An appointment is identified by its `AppointmentId`, never by its content.
//! Two appointments with identical fields are still different appointments,
//! and a clone keeps the id of the appointment it was cloned from.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity key of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentId(Uuid);

impl AppointmentId {
    pub fn new() -> Self {
        AppointmentId(Uuid::new_v4())
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A schedulable item displayed by a calendar view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub(crate) id: AppointmentId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_by: Option<String>,
    pub attendees: Vec<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub read_only: bool,

    /// Identifier from the calendar source this appointment was read from.
    /// Not used for identity.
    pub uid: Option<String>,

    // View flags
    /// Owned by the view; at most one appointment in a view is selected
    pub(crate) selected: bool,
    /// Set by `add_appointment` callers or by `update_appointment` via the classifier
    pub multi_day: bool,
    /// Hidden appointments are skipped by next/previous navigation
    pub visible: bool,
}

impl Appointment {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Appointment {
            id: AppointmentId::new(),
            title: title.into(),
            description: None,
            location: None,
            created_by: None,
            attendees: Vec::new(),
            start,
            end,
            all_day: false,
            read_only: false,
            uid: None,
            selected: false,
            multi_day: false,
            visible: true,
        }
    }

    pub fn id(&self) -> AppointmentId {
        self.id
    }

    /// Whether the view holding this appointment has it selected
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether this is the same appointment as `other` (same identity)
    pub fn is(&self, other: &Appointment) -> bool {
        self.id == other.id
    }

    /// Chronological order: start first, then end
    pub fn cmp_schedule(&self, other: &Appointment) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }

    /// Last calendar day the appointment occupies.
    /// An end at exactly midnight belongs to the day before.
    pub fn last_day(&self) -> NaiveDate {
        if self.end > self.start && self.end.time() == NaiveTime::MIN {
            (self.end - Duration::days(1)).date()
        } else {
            self.end.date()
        }
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Default multi-day classifier.
///
/// All-day appointments and appointments ending on a later calendar day
/// than they start are multi-day.
pub fn is_multi_day(appointment: &Appointment) -> bool {
    if appointment.all_day {
        return true;
    }
    appointment.last_day() > appointment.start.date()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_same_day_is_not_multi_day() {
        let appt = Appointment::new("Standup", at(10, 9), at(10, 10));
        assert!(!is_multi_day(&appt));
    }

    #[test]
    fn test_spanning_days_is_multi_day() {
        let appt = Appointment::new("Offsite", at(10, 9), at(12, 17));
        assert!(is_multi_day(&appt));
    }

    #[test]
    fn test_end_at_midnight_stays_on_start_day() {
        let appt = Appointment::new("Late shift", at(10, 18), at(11, 0));
        assert!(!is_multi_day(&appt));
        assert_eq!(appt.last_day(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_all_day_is_multi_day() {
        let mut appt = Appointment::new("Holiday", at(10, 0), at(10, 0));
        appt.all_day = true;
        assert!(is_multi_day(&appt));
    }

    #[test]
    fn test_end_before_start_is_not_multi_day() {
        let appt = Appointment::new("Broken", at(12, 9), at(10, 9));
        assert!(!is_multi_day(&appt));
    }

    #[test]
    fn test_clone_keeps_identity() {
        let appt = Appointment::new("Review", at(10, 9), at(10, 10));
        let twin = Appointment::new("Review", at(10, 9), at(10, 10));
        assert!(appt.is(&appt.clone()));
        assert!(!appt.is(&twin));
    }

    #[test]
    fn test_cmp_schedule_orders_by_start_then_end() {
        let a = Appointment::new("a", at(10, 9), at(10, 11));
        let b = Appointment::new("b", at(10, 9), at(10, 10));
        let c = Appointment::new("c", at(10, 8), at(10, 12));
        let mut list = vec![a, b, c];
        list.sort_by(|x, y| x.cmp_schedule(y));
        let titles: Vec<_> = list.iter().map(|x| x.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);
    }
}
