//! The renderer contract.
//!
//! A concrete view (day, week, month, list) implements `Renderer`. The view
//! calls `do_layout` whenever its visible state changed and layout is not
//! suspended. Renderers draw from the state they are given and must not
//! change appointments or the selection; the only mutation they get is
//! putting the appointments in chronological order.

use std::ops::Deref;

use crate::view::ViewState;

pub trait Renderer {
    fn do_layout(&mut self, layout: &mut LayoutContext<'_>);
}

impl<F> Renderer for F
where
    F: FnMut(&mut LayoutContext<'_>),
{
    fn do_layout(&mut self, layout: &mut LayoutContext<'_>) {
        self(layout)
    }
}

/// What a renderer sees during one layout pass
pub struct LayoutContext<'a> {
    state: &'a mut ViewState,
}

impl<'a> LayoutContext<'a> {
    pub(crate) fn new(state: &'a mut ViewState) -> Self {
        LayoutContext { state }
    }

    /// Order both appointment lists by start, then end, and clear the
    /// pending sort flag. Does nothing if no sort is pending.
    pub fn sort_appointments(&mut self) {
        if self.state.sort_pending {
            self.state.sort();
        }
    }
}

impl Deref for LayoutContext<'_> {
    type Target = ViewState;

    fn deref(&self) -> &ViewState {
        self.state
    }
}
