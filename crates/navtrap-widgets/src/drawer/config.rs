#![forbid(unsafe_code)]

//! Drawer behaviour configuration.

/// Where focus lands when the drawer opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InitialFocus {
    /// The designated close control, falling back to the first focusable
    /// descendant when none is designated or it cannot take focus.
    #[default]
    CloseControl,
    /// Always the first focusable descendant.
    FirstFocusable,
}

/// What Tab does while the drawer is open but has nothing focusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EmptyTabPolicy {
    /// Swallow the key so focus cannot leave the open drawer.
    #[default]
    Suppress,
    /// Let the runtime's native traversal run.
    Allow,
}

/// Drawer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawerConfig {
    pub close_on_escape: bool,
    pub initial_focus: InitialFocus,
    pub empty_tab: EmptyTabPolicy,
    pub restore_focus: bool,
    pub close_on_link_activate: bool,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            close_on_escape: true,
            initial_focus: InitialFocus::CloseControl,
            empty_tab: EmptyTabPolicy::Suppress,
            restore_focus: true,
            close_on_link_activate: true,
        }
    }
}

impl DrawerConfig {
    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    #[must_use]
    pub fn initial_focus(mut self, initial: InitialFocus) -> Self {
        self.initial_focus = initial;
        self
    }

    #[must_use]
    pub fn empty_tab(mut self, policy: EmptyTabPolicy) -> Self {
        self.empty_tab = policy;
        self
    }

    /// Set whether closing returns focus to the trigger.
    #[must_use]
    pub fn restore_focus(mut self, restore: bool) -> Self {
        self.restore_focus = restore;
        self
    }

    #[must_use]
    pub fn close_on_link_activate(mut self, close: bool) -> Self {
        self.close_on_link_activate = close;
        self
    }
}
