//! Plain-text agenda renderer.
//!
//! Implements the view's `Renderer` contract by writing the visible window
//! as colored terminal lines: the multi-day lane first, then one block per
//! day.

use calview_core::{Appointment, LayoutContext, Renderer};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

pub struct AgendaRenderer {
    today: NaiveDate,
    lines: Vec<String>,
    layouts: usize,
}

impl AgendaRenderer {
    pub fn new(today: NaiveDate) -> Self {
        AgendaRenderer {
            today,
            lines: Vec::new(),
            layouts: 0,
        }
    }

    /// Output of the most recent layout
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    pub fn layouts(&self) -> usize {
        self.layouts
    }

    /// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
    fn date_label(&self, date: NaiveDate) -> String {
        match (date - self.today).num_days() {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            _ => date.format("%a %b %-d").to_string(),
        }
    }
}

impl Renderer for AgendaRenderer {
    fn do_layout(&mut self, layout: &mut LayoutContext<'_>) {
        layout.sort_appointments();
        self.layouts += 1;

        let window = layout.window();
        let mut lines = Vec::new();

        let spanning: Vec<_> = layout
            .multi_day_appointments()
            .filter(|a| a.visible && window.overlaps(a))
            .collect();
        if !spanning.is_empty() {
            lines.push("All day".bold().to_string());
            for appt in spanning {
                let span = if appt.last_day() > appt.start.date() {
                    format!(
                        "{} - {}",
                        appt.start.format("%b %-d"),
                        appt.last_day().format("%b %-d")
                    )
                } else {
                    appt.start.format("%b %-d").to_string()
                };
                lines.push(format!(
                    "{} {} {}",
                    marker(appt),
                    format!("{:>15}", span).dimmed(),
                    appt.title
                ));
            }
            lines.push(String::new());
        }

        for date in window.dates() {
            lines.push(self.date_label(date).bold().to_string());

            let day: Vec<_> = layout
                .appointments()
                .filter(|a| a.visible && !a.multi_day && a.start.date() == date)
                .collect();
            if day.is_empty() {
                lines.push(format!("  {}", "No appointments".dimmed()));
            }
            for appt in day {
                lines.push(format_appointment(appt));
            }
            lines.push(String::new());
        }

        // No trailing blank line
        lines.pop();
        self.lines = lines;
    }
}

fn marker(appt: &Appointment) -> String {
    if appt.is_selected() {
        ">".green().to_string()
    } else {
        " ".to_string()
    }
}

/// e.g. "> 09:00-10:00 Planning @ Room 4"
fn format_appointment(appt: &Appointment) -> String {
    let time = format!("{}-{}", appt.start.format("%H:%M"), appt.end.format("%H:%M"));
    let mut line = format!(
        "{} {} {}",
        marker(appt),
        format!("{:>15}", time).dimmed(),
        appt.title
    );
    if let Some(location) = &appt.location {
        line.push_str(&format!(" {}", format!("@ {}", location).dimmed()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use calview_core::{CalendarSettings, CalendarView};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn appt(title: &str, start_day: u32, end_day: u32) -> Appointment {
        Appointment::new(
            title,
            day(start_day).and_hms_opt(9, 0, 0).unwrap(),
            day(end_day).and_hms_opt(10, 0, 0).unwrap(),
        )
    }

    fn view() -> CalendarView<AgendaRenderer> {
        let mut view =
            CalendarView::new(CalendarSettings::default(), AgendaRenderer::new(day(10)));
        view.set_date_and_days(day(10), 3);
        view
    }

    #[test]
    fn test_lists_each_day_in_window() {
        let view = view();
        let output = view.renderer().output();
        assert!(output.contains("Today"));
        assert!(output.contains("Tomorrow"));
        assert!(output.contains("Fri Jan 12"));
        assert_eq!(output.matches("No appointments").count(), 3);
    }

    #[test]
    fn test_multi_day_appointments_get_their_own_lane() {
        let mut view = view();
        view.update_appointment(appt("Conference", 10, 12));
        view.update_appointment(appt("Standup", 11, 11));

        let output = view.renderer().output();
        let lane = output.find("All day").expect("Should have multi-day lane");
        let conference = output.find("Conference").unwrap();
        let tomorrow = output.find("Tomorrow").unwrap();
        let standup = output.find("Standup").unwrap();

        assert!(lane < conference && conference < tomorrow);
        assert!(tomorrow < standup);
        assert_eq!(output.matches("Conference").count(), 1);
    }

    #[test]
    fn test_sorts_and_hides() {
        let mut view = view();
        view.suspend_layout();
        view.add_appointment(appt("Late", 10, 10));
        let mut early = appt("Early", 10, 10);
        early.start = day(10).and_hms_opt(7, 0, 0).unwrap();
        view.add_appointment(early);
        let mut hidden = appt("Hidden", 10, 10);
        hidden.visible = false;
        view.add_appointment(hidden);
        view.resume_layout();

        let output = view.renderer().output();
        assert!(output.find("Early").unwrap() < output.find("Late").unwrap());
        assert!(!output.contains("Hidden"));
        assert!(!view.is_sort_pending());
    }

    #[test]
    fn test_appointments_outside_window_are_not_listed() {
        let mut view = view();
        view.add_appointment(appt("Next week", 17, 17));
        assert!(!view.renderer().output().contains("Next week"));
    }
}
