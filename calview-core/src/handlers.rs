//! Event handlers registered on a calendar view.
//!
//! Each event kind keeps its own list of callbacks. Registering returns a
//! `HandlerRegistration` that unregisters the callback when passed back to
//! `CalendarView::remove_handler`. Delivery is synchronous, in registration
//! order.

use chrono::NaiveDateTime;

use crate::appointment::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Selection,
    ValueChange,
    Delete,
    Open,
    TimeBlockClick,
}

/// Handle returned when a handler is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerRegistration {
    kind: EventKind,
    id: u64,
}

impl HandlerRegistration {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// A different appointment became the selection
#[derive(Debug)]
pub struct SelectionEvent<'a> {
    pub selected: &'a Appointment,
}

/// The view's value (its selection) changed from `old` to `new`
#[derive(Debug)]
pub struct ValueChangeEvent<'a> {
    pub old: Option<&'a Appointment>,
    pub new: &'a Appointment,
}

/// An appointment is about to be removed. Any handler may cancel.
#[derive(Debug)]
pub struct DeleteEvent<'a> {
    /// The view's selection when the delete was requested
    pub selected: Option<&'a Appointment>,
    /// The appointment being removed, if it is in the view
    pub target: Option<&'a Appointment>,
    cancelled: bool,
}

impl<'a> DeleteEvent<'a> {
    pub fn new(selected: Option<&'a Appointment>, target: Option<&'a Appointment>) -> Self {
        DeleteEvent {
            selected,
            target,
            cancelled: false,
        }
    }

    /// Veto the removal
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// The host asked to open an appointment (e.g. double click)
#[derive(Debug)]
pub struct OpenEvent<'a> {
    pub appointment: &'a Appointment,
}

/// An empty time block was clicked
#[derive(Debug, Clone, Copy)]
pub struct TimeBlockClickEvent {
    pub time: NaiveDateTime,
}

pub type SelectionHandler = dyn FnMut(&SelectionEvent<'_>);
pub type ValueChangeHandler = dyn FnMut(&ValueChangeEvent<'_>);
pub type DeleteHandler = dyn FnMut(&mut DeleteEvent<'_>);
pub type OpenHandler = dyn FnMut(&OpenEvent<'_>);
pub type TimeBlockClickHandler = dyn FnMut(&TimeBlockClickEvent);

struct HandlerList<H: ?Sized> {
    entries: Vec<(u64, Box<H>)>,
}

impl<H: ?Sized> Default for HandlerList<H> {
    fn default() -> Self {
        HandlerList {
            entries: Vec::new(),
        }
    }
}

impl<H: ?Sized> HandlerList<H> {
    fn push(&mut self, id: u64, handler: Box<H>) {
        self.entries.push((id, handler));
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn handlers(&mut self) -> impl Iterator<Item = &mut Box<H>> {
        self.entries.iter_mut().map(|(_, handler)| handler)
    }
}

/// All handlers of one view, grouped by event kind
#[derive(Default)]
pub struct Handlers {
    next_id: u64,
    selection: HandlerList<SelectionHandler>,
    value_change: HandlerList<ValueChangeHandler>,
    delete: HandlerList<DeleteHandler>,
    open: HandlerList<OpenHandler>,
    time_block_click: HandlerList<TimeBlockClickHandler>,
}

impl Handlers {
    fn registration(&mut self, kind: EventKind) -> HandlerRegistration {
        self.next_id += 1;
        HandlerRegistration {
            kind,
            id: self.next_id,
        }
    }

    pub fn add_selection(&mut self, handler: Box<SelectionHandler>) -> HandlerRegistration {
        let reg = self.registration(EventKind::Selection);
        self.selection.push(reg.id, handler);
        reg
    }

    pub fn add_value_change(&mut self, handler: Box<ValueChangeHandler>) -> HandlerRegistration {
        let reg = self.registration(EventKind::ValueChange);
        self.value_change.push(reg.id, handler);
        reg
    }

    pub fn add_delete(&mut self, handler: Box<DeleteHandler>) -> HandlerRegistration {
        let reg = self.registration(EventKind::Delete);
        self.delete.push(reg.id, handler);
        reg
    }

    pub fn add_open(&mut self, handler: Box<OpenHandler>) -> HandlerRegistration {
        let reg = self.registration(EventKind::Open);
        self.open.push(reg.id, handler);
        reg
    }

    pub fn add_time_block_click(
        &mut self,
        handler: Box<TimeBlockClickHandler>,
    ) -> HandlerRegistration {
        let reg = self.registration(EventKind::TimeBlockClick);
        self.time_block_click.push(reg.id, handler);
        reg
    }

    /// Unregister a handler. Returns false if it was already removed.
    pub fn remove(&mut self, reg: HandlerRegistration) -> bool {
        match reg.kind {
            EventKind::Selection => self.selection.remove(reg.id),
            EventKind::ValueChange => self.value_change.remove(reg.id),
            EventKind::Delete => self.delete.remove(reg.id),
            EventKind::Open => self.open.remove(reg.id),
            EventKind::TimeBlockClick => self.time_block_click.remove(reg.id),
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Selection => self.selection.len(),
            EventKind::ValueChange => self.value_change.len(),
            EventKind::Delete => self.delete.len(),
            EventKind::Open => self.open.len(),
            EventKind::TimeBlockClick => self.time_block_click.len(),
        }
    }

    pub fn fire_selection(&mut self, event: &SelectionEvent<'_>) {
        for handler in self.selection.handlers() {
            handler(event);
        }
    }

    pub fn fire_value_change(&mut self, event: &ValueChangeEvent<'_>) {
        for handler in self.value_change.handlers() {
            handler(event);
        }
    }

    /// Deliver a delete event to every handler.
    /// Returns true if the removal should go ahead (nobody cancelled).
    pub fn fire_delete(&mut self, event: &mut DeleteEvent<'_>) -> bool {
        for handler in self.delete.handlers() {
            handler(event);
        }
        !event.is_cancelled()
    }

    pub fn fire_open(&mut self, event: &OpenEvent<'_>) {
        for handler in self.open.handlers() {
            handler(event);
        }
    }

    pub fn fire_time_block_click(&mut self, event: &TimeBlockClickEvent) {
        for handler in self.time_block_click.handlers() {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn appointment() -> Appointment {
        let start = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Appointment::new("Standup", start, start)
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = Handlers::default();

        for name in ["first", "second", "third"] {
            let log = log.clone();
            handlers.add_selection(Box::new(move |_| log.borrow_mut().push(name)));
        }

        let appt = appointment();
        handlers.fire_selection(&SelectionEvent { selected: &appt });
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_removed_handler_is_not_called() {
        let calls = Rc::new(RefCell::new(0));
        let mut handlers = Handlers::default();

        let counter = calls.clone();
        let reg = handlers.add_time_block_click(Box::new(move |_| *counter.borrow_mut() += 1));
        assert_eq!(reg.kind(), EventKind::TimeBlockClick);
        assert!(handlers.remove(reg));
        assert!(!handlers.remove(reg));

        let time = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        handlers.fire_time_block_click(&TimeBlockClickEvent { time });
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(handlers.count(EventKind::TimeBlockClick), 0);
    }

    #[test]
    fn test_delete_cancel_is_seen_by_later_handlers() {
        let seen_cancelled = Rc::new(RefCell::new(false));
        let mut handlers = Handlers::default();

        handlers.add_delete(Box::new(|event| event.cancel()));
        let seen = seen_cancelled.clone();
        handlers.add_delete(Box::new(move |event| {
            *seen.borrow_mut() = event.is_cancelled();
        }));

        let appt = appointment();
        let mut event = DeleteEvent::new(Some(&appt), Some(&appt));
        assert!(!handlers.fire_delete(&mut event));
        assert!(*seen_cancelled.borrow());
    }

    #[test]
    fn test_delete_without_handlers_commits() {
        let mut handlers = Handlers::default();
        let mut event = DeleteEvent::new(None, None);
        assert!(handlers.fire_delete(&mut event));
    }
}
