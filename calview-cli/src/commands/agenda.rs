use std::path::Path;

use anyhow::Result;
use calview_core::{CalendarSettings, CalendarView, DateWindow};
use chrono::Local;
use tracing::debug;

use crate::ics;
use crate::render::AgendaRenderer;

pub fn run(
    dir: &Path,
    window: DateWindow,
    settings: CalendarSettings,
    select: Option<&str>,
) -> Result<()> {
    let view = build_view(dir, window, settings, select)?;
    debug!(layouts = view.renderer().layouts(), "agenda ready");
    println!("{}", view.renderer().output());
    Ok(())
}

/// Load the appointments in `dir` into a view over `window`, laid out once
pub fn build_view(
    dir: &Path,
    window: DateWindow,
    settings: CalendarSettings,
    select: Option<&str>,
) -> Result<CalendarView<AgendaRenderer>> {
    let appointments = ics::load_appointments(dir)?;
    debug!(count = appointments.len(), dir = %dir.display(), "loaded appointments");

    let renderer = AgendaRenderer::new(Local::now().date_naive());
    let mut view = CalendarView::new(settings, renderer);

    view.suspend_layout();
    view.set_date_and_days(window.start, window.days);
    for appointment in appointments {
        view.update_appointment(appointment);
    }

    if let Some(uid) = select {
        let found = view
            .appointments()
            .find(|a| a.uid.as_deref() == Some(uid))
            .map(|a| a.id());
        match found {
            Some(id) => {
                view.set_value(id);
            }
            None => anyhow::bail!("No appointment with uid '{}' in {}", uid, dir.display()),
        }
    }
    view.resume_layout();

    Ok(view)
}
