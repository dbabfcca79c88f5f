#![forbid(unsafe_code)]

//! Navigation drawer overlay with keyboard focus trapping.
//!
//! # Focus Lifecycle
//!
//! - **Open**: the opener is remembered, the drawer mounts, a document-level
//!   key listener is acquired, and focus moves to the close button on the
//!   next frame.
//! - **Trap**: Tab and Shift+Tab cycle through the drawer's focusable
//!   elements, recomputed on every press so late-added or disabled content is
//!   respected.
//! - **Escape**: closes the drawer.
//! - **Close**: the drawer unmounts, the listener is released, and focus
//!   returns to the opener on the next frame if it can still take focus.
//!
//! # Example
//!
//! ```
//! use navtrap_core::event::{Event, KeyCode, KeyEvent};
//! use navtrap_widgets::drawer::{Activation, NavigationDrawer};
//!
//! let mut nav = NavigationDrawer::default();
//! assert_eq!(nav.activate(nav.trigger()), Activation::Opened);
//! nav.tick();
//! assert_eq!(nav.focused(), Some(nav.close_button()));
//!
//! nav.dispatch(&Event::Key(KeyEvent::new(KeyCode::Escape)));
//! nav.tick();
//! assert_eq!(nav.focused(), Some(nav.trigger()));
//! ```

mod config;
mod controller;
mod nav;

pub use config::{DrawerConfig, EmptyTabPolicy, InitialFocus};
pub use controller::{FocusTrapController, OverlayState, TrapAction};
pub use nav::{
    A11ySnapshot, Activation, CLOSE_LABEL, DRAWER_DOM_ID, DRAWER_LABEL, DispatchOutcome,
    NavLink, NavigationDrawer, TRIGGER_LABEL,
};
