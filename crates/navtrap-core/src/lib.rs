#![forbid(unsafe_code)]

//! Core primitives for navtrap: key events and logging setup.

pub mod event;
#[cfg(feature = "tracing-subscriber")]
pub mod logging;

pub use event::{Event, KeyCode, KeyDispatch, KeyEvent, KeyEventKind, Modifiers, ParseKeyError};
