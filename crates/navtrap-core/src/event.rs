#![forbid(unsafe_code)]

//! Keyboard input events.
//!
//! Events are plain data. A host translates its native key events into
//! [`Event`] values and wraps each one in a [`KeyDispatch`] while it travels
//! through listeners, so handlers can suppress the host's default action the
//! way a DOM listener calls `preventDefault()`.
//!
//! # Key names
//!
//! [`KeyEvent`] and [`KeyCode`] parse from short, case-insensitive names
//! (`"tab"`, `"shift+tab"`, `"esc"`, `"a"`). Parsing is the only fallible
//! operation here and reports [`ParseKeyError`].

use core::fmt;
use core::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT = 0b0010;
        const CTRL = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Identity of a pressed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    /// Shift+Tab as reported by terminals that fold the modifier into the key.
    BackTab,
    Backspace,
    Delete,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
    F(u8),
    /// A key the host could not identify.
    Unidentified,
}

/// Phase of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A single key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Key press without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Builder: set modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Builder: set event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether Shift is held, including the folded `BackTab` form.
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT) || self.code == KeyCode::BackTab
    }

    /// Tab or Shift+Tab in either encoding.
    #[must_use]
    pub fn is_tab(&self) -> bool {
        matches!(self.code, KeyCode::Tab | KeyCode::BackTab)
    }

    /// Press or auto-repeat; releases never trigger actions.
    #[must_use]
    pub fn is_keydown(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Input events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// The host window gained (`true`) or lost (`false`) focus.
    Focus(bool),
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        Self::Key(key)
    }
}

/// A key event in flight, carrying the prevent-default flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDispatch {
    event: KeyEvent,
    default_prevented: bool,
}

impl KeyDispatch {
    #[must_use]
    pub const fn new(event: KeyEvent) -> Self {
        Self {
            event,
            default_prevented: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn event(&self) -> &KeyEvent {
        &self.event
    }

    /// Suppress the host's default handling (e.g. native Tab traversal).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[inline]
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl From<KeyEvent> for KeyDispatch {
    fn from(event: KeyEvent) -> Self {
        Self::new(event)
    }
}

/// Error returned when a key name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseKeyError {
    /// The input was empty or only separators.
    Empty,
    /// The key name is not known.
    UnknownKey(String),
    /// A modifier name is not known.
    UnknownModifier(String),
}

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty key name"),
            Self::UnknownKey(name) => write!(f, "unknown key {name:?}"),
            Self::UnknownModifier(name) => write!(f, "unknown modifier {name:?}"),
        }
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for KeyCode {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ParseKeyError::Empty);
        }
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Self::Char(c));
        }
        let lower = name.to_ascii_lowercase();
        let code = match lower.as_str() {
            "enter" | "return" => Self::Enter,
            "esc" | "escape" => Self::Escape,
            "tab" => Self::Tab,
            "backtab" => Self::BackTab,
            "backspace" => Self::Backspace,
            "delete" | "del" => Self::Delete,
            "home" => Self::Home,
            "end" => Self::End,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "space" => Self::Char(' '),
            other => match other.strip_prefix('f').map(str::parse::<u8>) {
                Some(Ok(n)) if (1..=24).contains(&n) => Self::F(n),
                _ => return Err(ParseKeyError::UnknownKey(name.to_string())),
            },
        };
        Ok(code)
    }
}

impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    /// Parse `"mod+mod+key"`, e.g. `"shift+tab"` or `"ctrl+alt+f4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = parse_key_event(s);
        #[cfg(feature = "tracing")]
        {
            if let Err(err) = &parsed {
                tracing::trace!(input = s, error = %err, "key name rejected");
            }
        }
        parsed
    }
}

fn parse_key_event(s: &str) -> Result<KeyEvent, ParseKeyError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseKeyError::Empty);
    }
    // A lone "+" is the plus key, not a separator.
    if s == "+" {
        return Ok(KeyEvent::new(KeyCode::Char('+')));
    }
    let mut parts: Vec<&str> = s.split('+').collect();
    let key = parts.pop().ok_or(ParseKeyError::Empty)?;
    let mut modifiers = Modifiers::empty();
    for part in parts {
        modifiers |= match part.trim().to_ascii_lowercase().as_str() {
            "shift" => Modifiers::SHIFT,
            "alt" | "option" => Modifiers::ALT,
            "ctrl" | "control" => Modifiers::CTRL,
            "super" | "cmd" | "meta" => Modifiers::SUPER,
            _ => return Err(ParseKeyError::UnknownModifier(part.trim().to_string())),
        };
    }
    Ok(KeyEvent::new(key.parse()?).with_modifiers(modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_keys() {
        assert_eq!("tab".parse::<KeyCode>(), Ok(KeyCode::Tab));
        assert_eq!("Escape".parse::<KeyCode>(), Ok(KeyCode::Escape));
        assert_eq!("esc".parse::<KeyCode>(), Ok(KeyCode::Escape));
        assert_eq!("x".parse::<KeyCode>(), Ok(KeyCode::Char('x')));
        assert_eq!("F5".parse::<KeyCode>(), Ok(KeyCode::F(5)));
    }

    #[test]
    fn parse_modified_keys() {
        let ev: KeyEvent = "shift+tab".parse().unwrap();
        assert_eq!(ev.code, KeyCode::Tab);
        assert!(ev.modifiers.contains(Modifiers::SHIFT));
        assert!(ev.shift());

        let ev: KeyEvent = "Ctrl+Alt+Delete".parse().unwrap();
        assert_eq!(ev.code, KeyCode::Delete);
        assert_eq!(ev.modifiers, Modifiers::CTRL | Modifiers::ALT);
    }

    #[test]
    fn parse_plus_key() {
        let ev: KeyEvent = "+".parse().unwrap();
        assert_eq!(ev.code, KeyCode::Char('+'));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<KeyEvent>(), Err(ParseKeyError::Empty));
        assert_eq!(
            "hyper+tab".parse::<KeyEvent>(),
            Err(ParseKeyError::UnknownModifier("hyper".into()))
        );
        assert_eq!(
            "pageflip".parse::<KeyCode>(),
            Err(ParseKeyError::UnknownKey("pageflip".into()))
        );
        assert!("f99".parse::<KeyCode>().is_err());
    }

    #[test]
    fn backtab_counts_as_shifted_tab() {
        let ev = KeyEvent::new(KeyCode::BackTab);
        assert!(ev.is_tab());
        assert!(ev.shift());
    }

    #[test]
    fn release_is_not_keydown() {
        let ev = KeyEvent::new(KeyCode::Tab).with_kind(KeyEventKind::Release);
        assert!(!ev.is_keydown());
        assert!(KeyEvent::new(KeyCode::Tab).with_kind(KeyEventKind::Repeat).is_keydown());
    }

    #[test]
    fn prevent_default_sticks() {
        let mut dispatch = KeyDispatch::new(KeyEvent::new(KeyCode::Tab));
        assert!(!dispatch.is_default_prevented());
        dispatch.prevent_default();
        dispatch.prevent_default();
        assert!(dispatch.is_default_prevented());
    }

    #[test]
    fn parse_error_display() {
        assert_eq!(ParseKeyError::Empty.to_string(), "empty key name");
        assert_eq!(
            ParseKeyError::UnknownKey("zz".into()).to_string(),
            "unknown key \"zz\""
        );
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn rejected_key_names_are_traced() {
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        #[derive(Clone, Default)]
        struct Count(Arc<Mutex<usize>>);

        impl<S: tracing::Subscriber> Layer<S> for Count {
            fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                *self.0.lock().unwrap() += 1;
            }
        }

        let count = Count::default();
        let subscriber = tracing_subscriber::registry().with(count.clone());
        tracing::subscriber::with_default(subscriber, || {
            assert!("shift+tab".parse::<KeyEvent>().is_ok());
            assert!("hyper+tab".parse::<KeyEvent>().is_err());
            assert!("warp".parse::<KeyEvent>().is_err());
        });
        assert_eq!(*count.0.lock().unwrap(), 2);
    }
}
