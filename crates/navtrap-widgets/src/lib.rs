#![forbid(unsafe_code)]

//! Focus-trapping overlays for navtrap.
//!
//! - [`focus`]: element tree, the [`focus::FocusHost`] seam, and the
//!   document-level key listener registry.
//! - [`drawer`]: the focus-trap controller and the navigation drawer built
//!   on it.

pub mod drawer;
pub mod focus;

pub use drawer::{
    DrawerConfig, FocusTrapController, NavLink, NavigationDrawer, OverlayState, TrapAction,
};
pub use focus::{ElementId, ElementNode, ElementTree, FocusHost, KeyListenerRegistry};
