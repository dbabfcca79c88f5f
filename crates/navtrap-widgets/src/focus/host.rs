#![forbid(unsafe_code)]

//! The seam between focus controllers and the UI runtime that owns focus.
//!
//! Controllers never hold the element tree. Every operation borrows the host
//! for the duration of one call, so the host stays the single owner of
//! "which element is focused" and of mount state.

use super::tree::ElementId;

/// Focus change events recorded by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    FocusGained { id: ElementId },
    FocusLost { id: ElementId },
    FocusMoved { from: ElementId, to: ElementId },
}

impl FocusEvent {
    /// The element holding focus after this event, if any.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match *self {
            Self::FocusGained { id } => Some(id),
            Self::FocusMoved { to, .. } => Some(to),
            Self::FocusLost { .. } => None,
        }
    }
}

/// Capabilities a focus controller needs from the UI runtime.
pub trait FocusHost {
    /// Currently focused element.
    fn active_element(&self) -> Option<ElementId>;

    /// Move focus to `id`. Returns `false` (and leaves focus alone) if the
    /// element is missing, detached, hidden, or disabled.
    fn focus(&mut self, id: ElementId) -> bool;

    /// Whether `id` exists, is attached, and can take programmatic focus.
    fn can_focus(&self, id: ElementId) -> bool;

    /// Sequentially focusable descendants of `root`, in traversal order.
    ///
    /// Must be derived from current tree state on every call.
    fn focusable_within(&self, root: ElementId) -> Vec<ElementId>;

    /// Attach or detach the subtree rooted at `id` from the focus order.
    fn set_mounted(&mut self, id: ElementId, mounted: bool);

    /// Whether the subtree rooted at `id` is attached.
    fn is_mounted(&self, id: ElementId) -> bool;
}
