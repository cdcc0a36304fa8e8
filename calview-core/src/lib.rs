//! Core types for calview calendar views.
//!
//! This crate provides the state shared by every concrete view (day, week,
//! month, list):
//! - `CalendarView`, which owns the appointments, the selection and the
//!   visible date window, and decides when the renderer has to run
//! - `Appointment` and the multi-day classifier
//! - typed event handlers for selection, value change, delete, open and
//!   time block clicks
//! - `CalendarSettings`, the renderer configuration loaded from TOML

pub mod appointment;
pub mod date_window;
pub mod error;
pub mod handlers;
pub mod layout;
pub mod settings;
pub mod view;

pub use appointment::{Appointment, AppointmentId, is_multi_day};
pub use date_window::DateWindow;
pub use error::{CalViewError, CalViewResult};
pub use handlers::{
    DeleteEvent, EventKind, HandlerRegistration, OpenEvent, SelectionEvent, TimeBlockClickEvent,
    ValueChangeEvent,
};
pub use layout::{LayoutContext, Renderer};
pub use settings::{CalendarSettings, TimeBlockClick};
pub use view::{CalendarView, DEFAULT_DAYS, ViewState};
