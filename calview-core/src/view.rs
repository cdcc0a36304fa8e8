//! Shared state of every calendar view.
//!
//! `CalendarView` owns the appointments shown for a date window, the current
//! selection, and the multi-day subset that concrete views draw in their own
//! lane. Mutations ask the renderer to lay out again unless layout is
//! suspended, in which case one layout runs when it is resumed.
//!
//! Appointments live in an id-keyed store. `appointments`, the multi-day
//! list and the selection only hold ids, so identity checks are id
//! comparisons and an id that is not in the store is simply not in the view.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{debug, info, trace, warn};

use crate::appointment::{Appointment, AppointmentId, is_multi_day};
use crate::date_window::DateWindow;
use crate::handlers::{
    DeleteEvent, EventKind, HandlerRegistration, Handlers, OpenEvent, SelectionEvent,
    TimeBlockClickEvent, ValueChangeEvent,
};
use crate::layout::{LayoutContext, Renderer};
use crate::settings::CalendarSettings;

/// Number of days shown by a freshly created view
pub const DEFAULT_DAYS: u32 = 3;

/// Appointment and selection state, as seen by renderers
pub struct ViewState {
    settings: CalendarSettings,
    date: NaiveDate,
    days: u32,
    store: HashMap<AppointmentId, Appointment>,
    appointments: Vec<AppointmentId>,
    multi_day_appointments: Vec<AppointmentId>,
    selected: Option<AppointmentId>,
    pub(crate) sort_pending: bool,
}

impl ViewState {
    fn new(settings: CalendarSettings) -> Self {
        ViewState {
            settings,
            date: Local::now().date_naive(),
            days: DEFAULT_DAYS,
            store: HashMap::new(),
            appointments: Vec::new(),
            multi_day_appointments: Vec::new(),
            selected: None,
            sort_pending: true,
        }
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    /// Anchor date of the visible window
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.date, self.days)
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.len()
    }

    pub fn appointment_at(&self, index: usize) -> Option<&Appointment> {
        self.appointments
            .get(index)
            .and_then(|id| self.store.get(id))
    }

    pub fn appointment(&self, id: AppointmentId) -> Option<&Appointment> {
        self.store.get(&id)
    }

    pub fn contains(&self, id: AppointmentId) -> bool {
        self.store.contains_key(&id)
    }

    pub fn index_of(&self, id: AppointmentId) -> Option<usize> {
        self.appointments.iter().position(|&a| a == id)
    }

    /// Appointments in view order
    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> + '_ {
        self.appointments.iter().filter_map(|id| self.store.get(id))
    }

    /// Multi-day appointments in view order
    pub fn multi_day_appointments(&self) -> impl Iterator<Item = &Appointment> + '_ {
        self.multi_day_appointments
            .iter()
            .filter_map(|id| self.store.get(id))
    }

    pub fn multi_day_count(&self) -> usize {
        self.multi_day_appointments.len()
    }

    pub fn is_multi_day_listed(&self, id: AppointmentId) -> bool {
        self.multi_day_appointments.contains(&id)
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        self.selected.and_then(|id| self.store.get(&id))
    }

    pub fn selected_id(&self) -> Option<AppointmentId> {
        self.selected
    }

    /// Whether appointment order has to be recomputed before drawing
    pub fn is_sort_pending(&self) -> bool {
        self.sort_pending
    }

    pub(crate) fn sort(&mut self) {
        let store = &self.store;
        let by_schedule =
            |a: &AppointmentId, b: &AppointmentId| match (store.get(a), store.get(b)) {
                (Some(a), Some(b)) => a.cmp_schedule(b),
                _ => std::cmp::Ordering::Equal,
            };
        self.appointments.sort_by(by_schedule);
        self.multi_day_appointments.sort_by(by_schedule);
        self.sort_pending = false;
    }

    /// Store `appointment`, appending it to the view if it is new.
    /// The selected flag is normalized to the current selection.
    fn upsert(&mut self, mut appointment: Appointment) -> AppointmentId {
        let id = appointment.id;
        appointment.selected = self.selected == Some(id);
        if self.store.insert(id, appointment).is_none() {
            self.appointments.push(id);
        }
        id
    }

    fn sync_multi_day(&mut self, id: AppointmentId) {
        let multi_day = self.store.get(&id).is_some_and(|a| a.multi_day);
        let listed = self.multi_day_appointments.contains(&id);

        if multi_day && !listed {
            self.multi_day_appointments.push(id);
        } else if !multi_day && listed {
            self.multi_day_appointments.retain(|&a| a != id);
        }
    }

    /// Make `id` the selection, updating both selected flags
    fn select(&mut self, id: AppointmentId) -> Option<AppointmentId> {
        let old = self.selected.replace(id);
        if let Some(old_appt) = old.and_then(|old| self.store.get_mut(&old)) {
            old_appt.selected = false;
        }
        if let Some(appt) = self.store.get_mut(&id) {
            appt.selected = true;
        }
        old
    }

    fn clear_selection(&mut self) {
        if let Some(appt) = self.selected.take().and_then(|id| self.store.get_mut(&id)) {
            appt.selected = false;
        }
    }
}

/// Appointment, selection and date window state shared by all calendar views
pub struct CalendarView<R: Renderer> {
    state: ViewState,
    renderer: R,
    handlers: Handlers,
    classifier: fn(&Appointment) -> bool,
    layout_suspended: bool,
    layout_pending: bool,
}

impl<R: Renderer> CalendarView<R> {
    /// A view over today with a span of `DEFAULT_DAYS` days
    pub fn new(settings: CalendarSettings, renderer: R) -> Self {
        CalendarView {
            state: ViewState::new(settings),
            renderer,
            handlers: Handlers::default(),
            classifier: is_multi_day,
            layout_suspended: false,
            layout_pending: false,
        }
    }

    /// Replace the multi-day classifier used by `update_appointment`
    pub fn with_classifier(mut self, classifier: fn(&Appointment) -> bool) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // LAYOUT:

    pub fn suspend_layout(&mut self) {
        self.layout_suspended = true;
    }

    /// End a suspension, running one layout if anything asked for it meanwhile
    pub fn resume_layout(&mut self) {
        self.layout_suspended = false;
        if self.layout_pending {
            self.layout();
        }
    }

    pub fn is_layout_suspended(&self) -> bool {
        self.layout_suspended
    }

    pub fn is_layout_pending(&self) -> bool {
        self.layout_pending
    }

    fn layout(&mut self) {
        if self.layout_suspended {
            trace!("layout suspended; deferring");
            self.layout_pending = true;
            return;
        }

        self.layout_pending = false;
        debug!(
            appointments = self.state.appointments.len(),
            multi_day = self.state.multi_day_appointments.len(),
            date = %self.state.date,
            days = self.state.days,
            "running layout"
        );
        let mut context = LayoutContext::new(&mut self.state);
        self.renderer.do_layout(&mut context);
    }

    // SETTINGS + DATE WINDOW:

    pub fn settings(&self) -> &CalendarSettings {
        &self.state.settings
    }

    pub fn set_settings(&mut self, settings: CalendarSettings) {
        self.state.settings = settings;
        self.layout();
    }

    pub fn date(&self) -> NaiveDate {
        self.state.date
    }

    pub fn days(&self) -> u32 {
        self.state.days
    }

    pub fn window(&self) -> DateWindow {
        self.state.window()
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.state.date = date;
        self.layout();
    }

    pub fn set_date_and_days(&mut self, date: NaiveDate, days: u32) {
        self.state.date = date;
        self.state.days = checked_days(days);
        self.layout();
    }

    pub fn set_days(&mut self, days: u32) {
        self.state.days = checked_days(days);
        self.layout();
    }

    // APPOINTMENTS:

    pub fn appointment_count(&self) -> usize {
        self.state.appointment_count()
    }

    pub fn appointment_at(&self, index: usize) -> Option<&Appointment> {
        self.state.appointment_at(index)
    }

    pub fn appointment(&self, id: AppointmentId) -> Option<&Appointment> {
        self.state.appointment(id)
    }

    /// Direct access to a stored appointment. Its id and selected flag stay
    /// owned by the view. Changing `multi_day` here does not move the
    /// appointment in or out of the multi-day list; hand it to
    /// `update_appointment` for that.
    pub fn appointment_mut(&mut self, id: AppointmentId) -> Option<&mut Appointment> {
        self.state.store.get_mut(&id)
    }

    pub fn contains(&self, id: AppointmentId) -> bool {
        self.state.contains(id)
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> + '_ {
        self.state.appointments()
    }

    pub fn multi_day_appointments(&self) -> impl Iterator<Item = &Appointment> + '_ {
        self.state.multi_day_appointments()
    }

    pub fn is_sort_pending(&self) -> bool {
        self.state.sort_pending
    }

    /// Add an appointment. It goes on the multi-day list if its `multi_day`
    /// flag is already set; the classifier is not consulted.
    ///
    /// Adding an appointment that is already in the view replaces the stored
    /// record instead of listing it twice.
    pub fn add_appointment(&mut self, appointment: Appointment) -> AppointmentId {
        let id = appointment.id;
        let existing = self.state.contains(id);
        let multi_day = appointment.multi_day;

        self.state.upsert(appointment);
        if existing {
            debug!(%id, "appointment already in view; replacing record");
            self.state.sync_multi_day(id);
        } else if multi_day {
            self.state.multi_day_appointments.push(id);
        }

        self.state.sort_pending = true;
        self.layout();
        id
    }

    /// Add each appointment in order. Suspend layout around large batches.
    pub fn add_appointments<I>(&mut self, appointments: I) -> Vec<AppointmentId>
    where
        I: IntoIterator<Item = Appointment>,
    {
        appointments
            .into_iter()
            .map(|appointment| self.add_appointment(appointment))
            .collect()
    }

    /// Reclassify an appointment as multi-day or not, store it (adding it if
    /// it is new) and bring the multi-day list in line with the result.
    pub fn update_appointment(&mut self, mut appointment: Appointment) -> AppointmentId {
        appointment.multi_day = (self.classifier)(&appointment);
        let id = self.state.upsert(appointment);
        self.state.sync_multi_day(id);

        self.state.sort_pending = true;
        self.layout();
        id
    }

    /// Remove an appointment without asking delete handlers
    pub fn remove_appointment(&mut self, id: AppointmentId) {
        self.remove_appointment_with_events(id, false);
    }

    /// Remove an appointment, first giving delete handlers the chance to
    /// cancel when `fire_events` is set. The delete event carries the view's
    /// current selection alongside the removal target.
    ///
    /// A committed removal always clears the selection, whether or not the
    /// removed appointment was the selected one. Returns whether the removal
    /// was committed.
    pub fn remove_appointment_with_events(&mut self, id: AppointmentId, fire_events: bool) -> bool {
        if fire_events {
            let mut event =
                DeleteEvent::new(self.state.selected_appointment(), self.state.appointment(id));
            if !self.handlers.fire_delete(&mut event) {
                info!(%id, "appointment removal cancelled by delete handler");
                return false;
            }
        }

        self.state.clear_selection();
        self.state.store.remove(&id);
        self.state.appointments.retain(|&a| a != id);
        self.state.multi_day_appointments.retain(|&a| a != id);

        debug!(%id, "appointment removed");
        self.state.sort_pending = true;
        self.layout();
        true
    }

    /// Remove every appointment and clear the selection
    pub fn clear_appointments(&mut self) {
        self.state.selected = None;
        self.state.store.clear();
        self.state.appointments.clear();
        self.state.multi_day_appointments.clear();
        self.layout();
    }

    // SELECTION:

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        self.state.selected_appointment()
    }

    /// The view's value: its selected appointment
    pub fn value(&self) -> Option<&Appointment> {
        self.state.selected_appointment()
    }

    /// Select an appointment, adding it to the view if it isn't there yet.
    /// Fires no events and does not lay out.
    pub fn set_selected_appointment(&mut self, appointment: Appointment) -> AppointmentId {
        let id = self.state.upsert(appointment);
        self.state.select(id);
        id
    }

    /// Select an appointment already in the view. Fires no events and does
    /// not lay out. Returns false for unknown ids.
    pub fn select_appointment(&mut self, id: AppointmentId) -> bool {
        if !self.state.contains(id) {
            return false;
        }
        self.state.select(id);
        true
    }

    /// Select an appointment and notify value change and selection handlers
    pub fn set_value(&mut self, id: AppointmentId) -> bool {
        self.set_value_with_events(id, true)
    }

    /// Select an appointment already in the view. When `fire_events` is set
    /// and the selection actually changed, value change handlers and then
    /// selection handlers are notified. Returns false for unknown ids.
    pub fn set_value_with_events(&mut self, id: AppointmentId, fire_events: bool) -> bool {
        if !self.state.contains(id) {
            warn!(%id, "cannot select an appointment that is not in the view");
            return false;
        }

        let old = self.state.select(id);

        if fire_events && old != Some(id) {
            let new = &self.state.store[&id];
            let old = old.and_then(|old| self.state.store.get(&old));
            self.handlers
                .fire_value_change(&ValueChangeEvent { old, new });
            self.handlers.fire_selection(&SelectionEvent { selected: new });
        }
        true
    }

    /// Move the selection to the next appointment in view order
    pub fn select_next_appointment(&mut self) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        if index + 1 >= self.state.appointments.len() {
            return false;
        }
        self.select_if_visible(index + 1)
    }

    /// Move the selection to the previous appointment in view order
    pub fn select_previous_appointment(&mut self) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        if index == 0 {
            return false;
        }
        self.select_if_visible(index - 1)
    }

    fn selected_index(&self) -> Option<usize> {
        self.state
            .selected
            .and_then(|id| self.state.index_of(id))
    }

    fn select_if_visible(&mut self, index: usize) -> bool {
        let Some(target) = self.state.appointment_at(index) else {
            return false;
        };
        if !target.visible {
            return false;
        }
        let id = target.id;
        self.set_value(id)
    }

    // HANDLERS:

    pub fn add_selection_handler<F>(&mut self, handler: F) -> HandlerRegistration
    where
        F: FnMut(&SelectionEvent<'_>) + 'static,
    {
        self.handlers.add_selection(Box::new(handler))
    }

    pub fn add_value_change_handler<F>(&mut self, handler: F) -> HandlerRegistration
    where
        F: FnMut(&ValueChangeEvent<'_>) + 'static,
    {
        self.handlers.add_value_change(Box::new(handler))
    }

    /// Delete handlers may cancel a removal with `DeleteEvent::cancel`
    pub fn add_delete_handler<F>(&mut self, handler: F) -> HandlerRegistration
    where
        F: FnMut(&mut DeleteEvent<'_>) + 'static,
    {
        self.handlers.add_delete(Box::new(handler))
    }

    pub fn add_open_handler<F>(&mut self, handler: F) -> HandlerRegistration
    where
        F: FnMut(&OpenEvent<'_>) + 'static,
    {
        self.handlers.add_open(Box::new(handler))
    }

    pub fn add_time_block_click_handler<F>(&mut self, handler: F) -> HandlerRegistration
    where
        F: FnMut(&TimeBlockClickEvent) + 'static,
    {
        self.handlers.add_time_block_click(Box::new(handler))
    }

    pub fn remove_handler(&mut self, registration: HandlerRegistration) -> bool {
        self.handlers.remove(registration)
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.count(kind)
    }

    /// Notify open handlers. Returns false for unknown ids.
    pub fn fire_open(&mut self, id: AppointmentId) -> bool {
        let Some(appointment) = self.state.store.get(&id) else {
            return false;
        };
        self.handlers.fire_open(&OpenEvent { appointment });
        true
    }

    /// Notify time block click handlers; called by the host's input handling
    pub fn fire_time_block_click(&mut self, time: NaiveDateTime) {
        self.handlers
            .fire_time_block_click(&TimeBlockClickEvent { time });
    }
}

fn checked_days(days: u32) -> u32 {
    if days == 0 {
        warn!("span of 0 days requested; showing 1 day");
        return 1;
    }
    days
}
