// SPDX-License-Identifier: MIT
//
// Windows — the set of open views and which one has focus.

use crate::buffer::Buffer;
use crate::view::{MemoryView, View, ViewId};

/// The services a host window offers to plugins.
pub trait Window {
    /// Every open view, in tab order.
    fn views_mut(&mut self) -> Box<dyn Iterator<Item = &mut dyn View> + '_>;

    /// The focused view, if any view is open.
    fn active_view_mut(&mut self) -> Option<&mut dyn View>;
}

/// An in-memory window owning its views.
#[derive(Debug, Default)]
pub struct MemoryWindow {
    views: Vec<MemoryView>,
    active: Option<ViewId>,
    next_id: u32,
}

impl MemoryWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a view on `buffer` and focus it.
    pub fn open(&mut self, buffer: Buffer, syntax: Option<String>) -> ViewId {
        self.next_id += 1;
        let id = ViewId(self.next_id);
        let mut view = MemoryView::new(id, buffer);
        view.set_syntax(syntax);
        self.views.push(view);
        self.active = Some(id);
        id
    }

    /// Close a view. Focus moves to the last remaining view.
    pub fn close(&mut self, id: ViewId) -> Option<MemoryView> {
        let idx = self.views.iter().position(|v| v.id() == id)?;
        let view = self.views.remove(idx);
        if self.active == Some(id) {
            self.active = self.views.last().map(View::id);
        }
        Some(view)
    }

    /// Focus a view. Returns `false` if no such view is open.
    pub fn focus(&mut self, id: ViewId) -> bool {
        if self.view(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    #[inline]
    #[must_use]
    pub const fn active_id(&self) -> Option<ViewId> {
        self.active
    }

    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<&MemoryView> {
        self.views.iter().find(|v| v.id() == id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut MemoryView> {
        self.views.iter_mut().find(|v| v.id() == id)
    }

    /// All open views, in tab order.
    #[must_use]
    pub fn views(&self) -> &[MemoryView] {
        &self.views
    }
}

impl Window for MemoryWindow {
    fn views_mut(&mut self) -> Box<dyn Iterator<Item = &mut dyn View> + '_> {
        Box::new(self.views.iter_mut().map(|v| v as &mut dyn View))
    }

    fn active_view_mut(&mut self) -> Option<&mut dyn View> {
        let id = self.active?;
        self.view_mut(id).map(|v| v as &mut dyn View)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
