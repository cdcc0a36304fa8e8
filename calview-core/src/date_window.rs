//! Visible date window of a calendar view.

use chrono::{Days, Local, NaiveDate};

use crate::appointment::Appointment;

/// Consecutive calendar days shown by a view, anchored at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub days: u32,
}

impl DateWindow {
    /// A window of `days` days starting at `start`. A span of 0 becomes 1.
    pub fn new(start: NaiveDate, days: u32) -> Self {
        DateWindow {
            start,
            days: days.max(1),
        }
    }

    /// Parse window arguments.
    /// - `from`: YYYY-MM-DD, defaults to today
    /// - `days`: span, defaults to `default_days`
    pub fn from_args(
        from: Option<&str>,
        days: Option<u32>,
        default_days: u32,
    ) -> Result<Self, String> {
        let start = match from {
            Some(s) => parse_date(s)?,
            None => Local::now().date_naive(),
        };

        let days = days.unwrap_or(default_days);
        if days == 0 {
            return Err("Span must be at least one day".to_string());
        }

        Ok(DateWindow::new(start, days))
    }

    /// Last visible day (inclusive). Stops at the last representable date.
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(u64::from(self.days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Visible days in order, up to the last representable date
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.days as usize)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    /// Whether any day of the appointment falls inside the window
    pub fn overlaps(&self, appointment: &Appointment) -> bool {
        let first = appointment.start.date();
        let last = appointment.last_day().max(first);
        first <= self.end() && last >= self.start
    }
}

/// Parse YYYY-MM-DD
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_window_end_is_inclusive() {
        let window = DateWindow::new(day(10), 3);
        assert_eq!(window.end(), day(12));
        assert!(window.contains(day(10)));
        assert!(window.contains(day(12)));
        assert!(!window.contains(day(13)));
        assert!(!window.contains(day(9)));
    }

    #[test]
    fn test_zero_span_becomes_one_day() {
        let window = DateWindow::new(day(10), 0);
        assert_eq!(window.days, 1);
        assert_eq!(window.end(), day(10));
    }

    #[test]
    fn test_dates_lists_each_visible_day() {
        let window = DateWindow::new(day(30), 3);
        let dates: Vec<_> = window.dates().collect();
        assert_eq!(
            dates,
            vec![day(30), day(31), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()]
        );
    }

    #[test]
    fn test_window_at_end_of_calendar_saturates() {
        let window = DateWindow::new(NaiveDate::MAX, 2);
        assert_eq!(window.end(), NaiveDate::MAX);
        assert_eq!(window.dates().collect::<Vec<_>>(), vec![NaiveDate::MAX]);
        assert!(window.contains(NaiveDate::MAX));

        let window = DateWindow::new(day(10), u32::MAX);
        assert_eq!(window.end(), NaiveDate::MAX);

        let window = DateWindow { start: day(10), days: 0 };
        assert_eq!(window.end(), day(10));
        assert_eq!(window.dates().count(), 0);
    }

    #[test]
    fn test_overlaps_appointment_crossing_window_start() {
        let window = DateWindow::new(day(10), 3);
        let start = day(8).and_hms_opt(9, 0, 0).unwrap();
        let end = day(10).and_hms_opt(9, 0, 0).unwrap();
        assert!(window.overlaps(&Appointment::new("Trip", start, end)));

        let end = day(9).and_hms_opt(23, 0, 0).unwrap();
        assert!(!window.overlaps(&Appointment::new("Earlier", start, end)));
    }

    #[test]
    fn test_from_args_parses_date_and_span() {
        let window = DateWindow::from_args(Some("2024-01-10"), Some(7), 3).unwrap();
        assert_eq!(window, DateWindow::new(day(10), 7));

        let window = DateWindow::from_args(Some("2024-01-10"), None, 3).unwrap();
        assert_eq!(window.days, 3);
    }

    #[test]
    fn test_from_args_rejects_bad_input() {
        assert!(DateWindow::from_args(Some("10/01/2024"), None, 3).is_err());
        assert!(DateWindow::from_args(Some("2024-01-10"), Some(0), 3).is_err());
    }
}
