#![forbid(unsafe_code)]

//! Focus-trap controller for an overlay surface.
//!
//! The controller owns the open/closed state of one overlay surface and
//! keeps keyboard focus inside it while open.
//!
//! # Invariants
//!
//! 1. `state() == Open` iff the surface is mounted in the host.
//! 2. A key listener is held iff the state is `Open`; it is released on
//!    close, on [`FocusTrapController::dispose`], and when the controller is
//!    dropped.
//! 3. The focusable set is re-derived from the host on every Tab press and
//!    never cached. Deriving it never changes state.
//! 4. Each `open()` schedules at most one initial focus move, applied by the
//!    next [`FocusTrapController::on_frame`]. A `close()` before that frame
//!    replaces it with the restore move.
//! 5. `open()` while open and `close()` while closed have no side effects.
//!
//! # Failure Modes
//!
//! There are none that surface as errors:
//! - Tab with an empty focusable set is suppressed (or allowed, per
//!   [`EmptyTabPolicy`]).
//! - Focus that drifted outside the trap is pulled back in on the next Tab.
//! - A trigger that was removed or disabled before close is not refocused;
//!   focus is left unmanaged.
//! - Key releases and unidentified keys are ignored.

use navtrap_core::event::{KeyCode, KeyDispatch};

use super::config::{DrawerConfig, EmptyTabPolicy, InitialFocus};
use crate::focus::{ElementId, FocusHost, KeyListener, KeyListenerRegistry, ListenerId};

/// Open/closed state of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

/// What the controller did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapAction {
    /// Not intercepted; the event keeps its default handling.
    Ignored,
    /// Tab inside the set, not at an edge: native traversal proceeds.
    Passthrough,
    /// Escape closed the overlay.
    Closed,
    /// Tab with nothing focusable in the surface.
    EmptySet,
    /// Focus was outside the set and was moved back in.
    Entered(ElementId),
    /// Tab at an edge wrapped focus to the other end.
    Wrapped(ElementId),
}

/// Deferred focus work applied on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingFocus {
    Initial,
    Restore(ElementId),
}

/// Controller for a focus-trapping overlay surface.
#[derive(Debug)]
pub struct FocusTrapController {
    surface: ElementId,
    initial_target: Option<ElementId>,
    config: DrawerConfig,
    state: OverlayState,
    trigger: Option<ElementId>,
    pending: Option<PendingFocus>,
    registry: KeyListenerRegistry,
    listener: Option<KeyListener>,
}

impl FocusTrapController {
    /// Create a closed controller for `surface`.
    ///
    /// Key listeners are acquired from `registry` while open.
    #[must_use]
    pub fn new(surface: ElementId, registry: KeyListenerRegistry) -> Self {
        Self {
            surface,
            initial_target: None,
            config: DrawerConfig::default(),
            state: OverlayState::Closed,
            trigger: None,
            pending: None,
            registry,
            listener: None,
        }
    }

    /// Designate the element that receives focus on open (the close control).
    #[must_use]
    pub fn with_initial_target(mut self, target: ElementId) -> Self {
        self.initial_target = Some(target);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: DrawerConfig) -> Self {
        self.config = config;
        self
    }

    // --- State Queries ---

    #[inline]
    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == OverlayState::Open
    }

    #[inline]
    #[must_use]
    pub fn surface(&self) -> ElementId {
        self.surface
    }

    #[must_use]
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    /// The element that opened the overlay, for the current cycle.
    #[must_use]
    pub fn trigger(&self) -> Option<ElementId> {
        self.trigger
    }

    /// Whether a deferred focus move is waiting for the next frame.
    #[must_use]
    pub fn has_pending_focus(&self) -> bool {
        self.pending.is_some()
    }

    /// ID of the held key listener, while open.
    #[must_use]
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.listener.as_ref().map(KeyListener::id)
    }

    /// Current focusable set of the surface, derived fresh from the host.
    #[must_use]
    pub fn focusable_set<H: FocusHost + ?Sized>(&self, host: &H) -> Vec<ElementId> {
        host.focusable_within(self.surface)
    }

    // --- Transitions ---

    /// Open the overlay. Returns `false` if it was already open.
    pub fn open<H: FocusHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.is_open() {
            return false;
        }
        // Reopening before a pending restore ran keeps the previous opener
        // when focus has nowhere else to be.
        let carried = match self.pending {
            Some(PendingFocus::Restore(trigger)) => Some(trigger),
            _ => None,
        };
        self.trigger = host.active_element().or(carried);
        self.state = OverlayState::Open;
        host.set_mounted(self.surface, true);
        self.listener = Some(self.registry.listen());
        self.pending = Some(PendingFocus::Initial);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            surface = self.surface.id(),
            trigger = ?self.trigger.map(ElementId::id),
            "overlay opened"
        );
        true
    }

    /// Close the overlay. Returns `false` if it was already closed.
    pub fn close<H: FocusHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = OverlayState::Closed;
        self.listener = None;
        host.set_mounted(self.surface, false);
        let trigger = self.trigger.take();
        self.pending = if self.config.restore_focus {
            trigger.map(PendingFocus::Restore)
        } else {
            None
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            surface = self.surface.id(),
            restore = ?trigger.map(ElementId::id),
            "overlay closed"
        );
        true
    }

    /// Tear down: unmount if open, release the listener, and drop any
    /// pending focus work. Focus is not restored.
    pub fn dispose<H: FocusHost + ?Sized>(mut self, host: &mut H) {
        if self.is_open() {
            host.set_mounted(self.surface, false);
        }
        self.state = OverlayState::Closed;
        self.listener = None;
        self.pending = None;
    }

    /// Apply deferred focus work. Call once per frame, after the host has
    /// laid out mount changes.
    ///
    /// Returns the element that received focus, if any.
    pub fn on_frame<H: FocusHost + ?Sized>(&mut self, host: &mut H) -> Option<ElementId> {
        let target = match self.pending.take()? {
            PendingFocus::Initial => self.initial_focus_target(host)?,
            PendingFocus::Restore(trigger) => {
                if !host.can_focus(trigger) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(trigger = trigger.id(), "trigger gone; focus unmanaged");
                    return None;
                }
                trigger
            }
        };
        host.focus(target).then_some(target)
    }

    fn initial_focus_target<H: FocusHost + ?Sized>(&self, host: &H) -> Option<ElementId> {
        let designated = match self.config.initial_focus {
            InitialFocus::CloseControl => self.initial_target.filter(|&t| host.can_focus(t)),
            InitialFocus::FirstFocusable => None,
        };
        designated.or_else(|| self.focusable_set(host).first().copied())
    }

    // --- Event Handling ---

    /// Handle a keydown while open. Ignored entirely while closed.
    pub fn handle_key_down<H: FocusHost + ?Sized>(
        &mut self,
        host: &mut H,
        dispatch: &mut KeyDispatch,
    ) -> TrapAction {
        if !self.is_open() || self.listener.is_none() {
            return TrapAction::Ignored;
        }
        let event = *dispatch.event();
        if !event.is_keydown() {
            return TrapAction::Ignored;
        }

        match event.code {
            KeyCode::Escape if self.config.close_on_escape => {
                dispatch.prevent_default();
                self.close(host);
                TrapAction::Closed
            }
            KeyCode::Tab | KeyCode::BackTab => self.trap_tab(host, dispatch, event.shift()),
            _ => TrapAction::Ignored,
        }
    }

    fn trap_tab<H: FocusHost + ?Sized>(
        &mut self,
        host: &mut H,
        dispatch: &mut KeyDispatch,
        backward: bool,
    ) -> TrapAction {
        let set = self.focusable_set(host);
        let (Some(&first), Some(&last)) = (set.first(), set.last()) else {
            if self.config.empty_tab == EmptyTabPolicy::Suppress {
                dispatch.prevent_default();
            }
            return TrapAction::EmptySet;
        };

        let active = host.active_element();
        let inside = active.is_some_and(|a| set.contains(&a));

        let (target, wrapped) = if !inside {
            (if backward { last } else { first }, false)
        } else if backward && active == Some(first) {
            (last, true)
        } else if !backward && active == Some(last) {
            (first, true)
        } else {
            return TrapAction::Passthrough;
        };

        dispatch.prevent_default();
        host.focus(target);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target_id = target.id(),
            backward,
            set_len = set.len(),
            "focus trap redirected tab"
        );
        if wrapped {
            TrapAction::Wrapped(target)
        } else {
            TrapAction::Entered(target)
        }
    }
}
