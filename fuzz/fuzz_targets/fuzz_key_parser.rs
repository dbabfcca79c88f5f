//! Fuzz harness for the key-name parser.
//!
//! Arbitrary strings must parse or fail cleanly, and anything that parses
//! must parse again to the same event after lowercasing.

#![no_main]
use libfuzzer_sys::fuzz_target;
use navtrap_core::event::{KeyCode, KeyEvent};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = s.parse::<KeyCode>();

    if let Ok(event) = s.parse::<KeyEvent>()
        && s.is_ascii()
    {
        let lowered = s.to_ascii_lowercase();
        if let Ok(again) = lowered.parse::<KeyEvent>()
            && !matches!(event.code, KeyCode::Char(_))
        {
            assert_eq!(again, event, "case changed the parse of {s:?}");
        }
    }
});
