#![forbid(unsafe_code)]

//! Focus management: element tree, host seam, and key listener registry.

pub mod host;
pub mod listener;
pub mod tree;

pub use host::{FocusEvent, FocusHost};
pub use listener::{KeyListener, KeyListenerRegistry, ListenerId};
pub use tree::{ElementId, ElementKind, ElementNode, ElementTree, FOCUS_EVENT_CAPACITY};
