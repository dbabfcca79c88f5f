//! Structured fuzz harness for the navigation drawer.
//!
//! Drives arbitrary sequences of clicks, keys, frames and link edits and
//! checks the listener and mount invariants after every operation.

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use navtrap_core::event::{Event, KeyCode, KeyEvent, Modifiers};
use navtrap_widgets::drawer::{DrawerConfig, InitialFocus, NavLink, NavigationDrawer};
use navtrap_widgets::focus::FocusHost;

#[derive(Debug, Arbitrary)]
enum Op {
    ClickTrigger,
    ClickClose,
    ClickLink(u8),
    Tab,
    ShiftTab,
    Escape,
    Enter,
    Space,
    Tick,
    AddLink,
    RemoveLink(u8),
    ToggleLink(u8, bool),
}

#[derive(Debug, Arbitrary)]
struct Input {
    links: u8,
    first_focusable: bool,
    restore_focus: bool,
    ops: Vec<Op>,
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code))
}

fuzz_target!(|input: Input| {
    let mut config = DrawerConfig::default().restore_focus(input.restore_focus);
    if input.first_focusable {
        config = config.initial_focus(InitialFocus::FirstFocusable);
    }
    let links = (0..input.links % 8).map(|i| NavLink::new(format!("Link {i}"), format!("/{i}")));
    let mut nav = NavigationDrawer::new(config, links);
    nav.focus_trigger();

    for op in input.ops.iter().take(256) {
        let ids = nav.link_ids();
        let pick = |n: u8| (!ids.is_empty()).then(|| ids[n as usize % ids.len()]);
        match *op {
            Op::ClickTrigger => {
                nav.activate(nav.trigger());
            }
            Op::ClickClose => {
                nav.activate(nav.close_button());
            }
            Op::ClickLink(n) => {
                if let Some(id) = pick(n) {
                    nav.activate(id);
                }
            }
            Op::Tab => {
                nav.dispatch(&key(KeyCode::Tab));
            }
            Op::ShiftTab => {
                nav.dispatch(&Event::Key(
                    KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT),
                ));
            }
            Op::Escape => {
                nav.dispatch(&key(KeyCode::Escape));
            }
            Op::Enter => {
                nav.dispatch(&key(KeyCode::Enter));
            }
            Op::Space => {
                nav.dispatch(&key(KeyCode::Char(' ')));
            }
            Op::Tick => {
                nav.tick();
            }
            Op::AddLink => {
                if ids.len() < 16 {
                    nav.add_link(NavLink::new("Extra", "/extra"));
                }
            }
            Op::RemoveLink(n) => {
                if let Some(id) = pick(n) {
                    nav.remove_link(id);
                }
            }
            Op::ToggleLink(n, disabled) => {
                if let Some(id) = pick(n) {
                    nav.set_link_disabled(id, disabled);
                }
            }
        }

        let open = nav.is_open();
        assert_eq!(nav.tree().is_mounted(nav.drawer()), open);
        assert_eq!(nav.registry().active_count(), usize::from(open));
        assert_eq!(nav.a11y_snapshot().expanded, open);
    }
});
