#![forbid(unsafe_code)]

//! Navigation header with a slide-in drawer.
//!
//! [`NavigationDrawer`] owns the element tree for a page header (menu trigger
//! and logo link) and the primary navigation drawer (heading, close button,
//! and a list of links). It wires the tree to a [`FocusTrapController`] and
//! plays the role of the runtime: routing key events through the listener
//! registry, running native Tab traversal when nobody prevents it, and
//! pumping frames.
//!
//! Route changes are not performed here. Activating a link reports its
//! `href` in [`Activation::Navigated`] and closes the drawer.

use navtrap_core::event::{Event, KeyCode, KeyDispatch};

use super::config::DrawerConfig;
use super::controller::{FocusTrapController, OverlayState, TrapAction};
use crate::focus::{
    ElementId, ElementKind, ElementNode, ElementTree, FocusHost, KeyListenerRegistry,
};

/// Document id of the drawer, referenced by the trigger's `aria-controls`.
pub const DRAWER_DOM_ID: &str = "primary-navigation-drawer";
/// Accessible name of the menu trigger.
pub const TRIGGER_LABEL: &str = "Open menu";
/// Accessible name of the drawer's close button.
pub const CLOSE_LABEL: &str = "Close menu";
/// Accessible name of the drawer.
pub const DRAWER_LABEL: &str = "Primary navigation";

/// A navigation entry in the drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    #[must_use]
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Result of activating (clicking / pressing Enter on) an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Opened,
    Closed,
    /// A link was followed. The drawer closes first when configured to.
    Navigated { href: String },
    /// The element is not interactive, missing, or the action was a no-op.
    Ignored,
}

/// Outcome of dispatching one input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub action: TrapAction,
    pub default_prevented: bool,
    /// Set when the event's default action activated an element.
    pub activation: Option<Activation>,
}

impl DispatchOutcome {
    fn ignored() -> Self {
        Self {
            action: TrapAction::Ignored,
            default_prevented: false,
            activation: None,
        }
    }
}

/// Accessibility facts about the header and drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A11ySnapshot {
    /// `aria-expanded` on the trigger.
    pub expanded: bool,
    /// `aria-controls` on the trigger.
    pub controls: String,
    pub drawer_visible: bool,
    pub drawer_label: String,
    /// Accessible name of the focused element.
    pub focused: Option<String>,
}

/// Page header plus navigation drawer, driven by a focus trap.
#[derive(Debug)]
pub struct NavigationDrawer {
    tree: ElementTree,
    registry: KeyListenerRegistry,
    controller: FocusTrapController,
    trigger: ElementId,
    logo: ElementId,
    drawer: ElementId,
    close_button: ElementId,
    nav: ElementId,
    links: Vec<(ElementId, NavLink)>,
}

impl Default for NavigationDrawer {
    fn default() -> Self {
        Self::new(DrawerConfig::default(), [NavLink::new("Home", "/")])
    }
}

impl NavigationDrawer {
    /// Build the header and a closed drawer holding `links`.
    #[must_use]
    pub fn new(config: DrawerConfig, links: impl IntoIterator<Item = NavLink>) -> Self {
        let mut tree = ElementTree::new();
        let root = tree.root();

        let header = append(&mut tree, root, ElementNode::container());
        let trigger = append(&mut tree, header, ElementNode::button(TRIGGER_LABEL));
        let title = append(&mut tree, header, ElementNode::new(ElementKind::Heading));
        let logo = append(&mut tree, title, ElementNode::link("Logo", "/"));

        let drawer = append(
            &mut tree,
            root,
            ElementNode::container()
                .with_dom_id(DRAWER_DOM_ID)
                .with_label(DRAWER_LABEL),
        );
        let bar = append(&mut tree, drawer, ElementNode::container());
        append(&mut tree, bar, ElementNode::heading("Navigation"));
        let close_button = append(&mut tree, bar, ElementNode::button(CLOSE_LABEL));
        let nav = append(&mut tree, drawer, ElementNode::container());
        tree.set_mounted(drawer, false);

        let registry = KeyListenerRegistry::new();
        let controller = FocusTrapController::new(drawer, registry.clone())
            .with_initial_target(close_button)
            .with_config(config);

        let mut this = Self {
            tree,
            registry,
            controller,
            trigger,
            logo,
            drawer,
            close_button,
            nav,
            links: Vec::new(),
        };
        for link in links {
            this.add_link(link);
        }
        this
    }

    // --- Accessors ---

    #[must_use]
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Mutable tree access for content changes outside the link API.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    #[must_use]
    pub fn registry(&self) -> &KeyListenerRegistry {
        &self.registry
    }

    #[must_use]
    pub fn controller(&self) -> &FocusTrapController {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    #[inline]
    #[must_use]
    pub fn logo(&self) -> ElementId {
        self.logo
    }

    #[inline]
    #[must_use]
    pub fn drawer(&self) -> ElementId {
        self.drawer
    }

    #[inline]
    #[must_use]
    pub fn close_button(&self) -> ElementId {
        self.close_button
    }

    /// Link element IDs in drawer order.
    #[must_use]
    pub fn link_ids(&self) -> Vec<ElementId> {
        self.links.iter().map(|(id, _)| *id).collect()
    }

    #[must_use]
    pub fn link(&self, id: ElementId) -> Option<&NavLink> {
        self.links.iter().find(|(l, _)| *l == id).map(|(_, link)| link)
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.controller.state()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.tree.active_element()
    }

    /// Accessible name of the focused element.
    #[must_use]
    pub fn focused_label(&self) -> Option<&str> {
        self.focused()
            .and_then(|id| self.tree.get(id))
            .and_then(|node| node.label.as_deref())
    }

    // --- Content ---

    /// Append a link to the drawer's navigation list.
    pub fn add_link(&mut self, link: NavLink) -> ElementId {
        let id = append(
            &mut self.tree,
            self.nav,
            ElementNode::link(link.label.clone(), link.href.clone()),
        );
        self.links.push((id, link));
        id
    }

    /// Remove a link. Returns `None` if `id` is not a drawer link.
    pub fn remove_link(&mut self, id: ElementId) -> Option<NavLink> {
        let idx = self.links.iter().position(|(l, _)| *l == id)?;
        let _ = self.tree.remove(id);
        Some(self.links.remove(idx).1)
    }

    pub fn set_link_disabled(&mut self, id: ElementId, disabled: bool) {
        if self.link(id).is_some() {
            self.tree.set_disabled(id, disabled);
        }
    }

    // --- Lifecycle ---

    /// Give focus to the menu trigger.
    pub fn focus_trigger(&mut self) -> bool {
        self.tree.focus(self.trigger)
    }

    pub fn open(&mut self) -> bool {
        self.controller.open(&mut self.tree)
    }

    pub fn close(&mut self) -> bool {
        self.controller.close(&mut self.tree)
    }

    /// Run one frame: apply deferred focus moves.
    pub fn tick(&mut self) -> Option<ElementId> {
        self.controller.on_frame(&mut self.tree)
    }

    /// Activate an element as a pointer click would.
    ///
    /// The clicked element takes focus before its action runs, so opening
    /// from the trigger always records the trigger as the restore target.
    pub fn activate(&mut self, id: ElementId) -> Activation {
        if !self.tree.focus(id) {
            return Activation::Ignored;
        }
        let activation = if id == self.trigger {
            if self.open() {
                Activation::Opened
            } else {
                Activation::Ignored
            }
        } else if id == self.close_button {
            if self.close() {
                Activation::Closed
            } else {
                Activation::Ignored
            }
        } else if let Some(href) = self.tree.get(id).and_then(ElementNode::href) {
            let href = href.to_string();
            if self.tree.contains(self.drawer, id) && self.controller.config().close_on_link_activate
            {
                self.close();
            }
            Activation::Navigated { href }
        } else {
            Activation::Ignored
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(element = id.id(), ?activation, "activated");
        activation
    }

    /// Route an input event: key listeners first, then the default action
    /// (Tab traversal, Enter/Space activation) unless it was prevented.
    pub fn dispatch(&mut self, event: &Event) -> DispatchOutcome {
        let Event::Key(key) = *event else {
            return DispatchOutcome::ignored();
        };
        let mut dispatch = KeyDispatch::new(key);

        let listening = self
            .controller
            .listener_id()
            .is_some_and(|id| self.registry.is_registered(id));
        let action = if listening {
            self.controller.handle_key_down(&mut self.tree, &mut dispatch)
        } else {
            TrapAction::Ignored
        };

        let mut activation = None;
        if !dispatch.is_default_prevented() && key.is_keydown() {
            if key.is_tab() {
                self.tree.tab_traverse(!key.shift());
            } else if let Some(active) = self.tree.active_element() {
                let is_button = self
                    .tree
                    .get(active)
                    .is_some_and(|n| n.kind == ElementKind::Button);
                match key.code {
                    KeyCode::Enter => activation = Some(self.activate(active)),
                    KeyCode::Char(' ') if is_button => activation = Some(self.activate(active)),
                    _ => {}
                }
            }
        }

        DispatchOutcome {
            action,
            default_prevented: dispatch.is_default_prevented(),
            activation,
        }
    }

    /// Current accessibility facts.
    #[must_use]
    pub fn a11y_snapshot(&self) -> A11ySnapshot {
        A11ySnapshot {
            expanded: self.is_open(),
            controls: DRAWER_DOM_ID.to_string(),
            drawer_visible: self.tree.is_mounted(self.drawer),
            drawer_label: DRAWER_LABEL.to_string(),
            focused: self.focused_label().map(str::to_string),
        }
    }
}

/// Insert under a parent created by this module. Such parents always exist;
/// release builds fall back to the root if that ever stops holding.
fn append(tree: &mut ElementTree, parent: ElementId, node: ElementNode) -> ElementId {
    let inserted = tree.insert(parent, node);
    debug_assert!(inserted.is_some(), "append under missing parent {parent:?}");
    inserted.unwrap_or_else(|| tree.root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtrap_core::event::{KeyEvent, Modifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    #[test]
    fn starts_closed_with_hidden_drawer() {
        let nav = NavigationDrawer::default();
        assert_eq!(nav.state(), OverlayState::Closed);
        assert!(!nav.tree().is_mounted(nav.drawer()));
        assert_eq!(nav.link_ids().len(), 1);
        assert_eq!(nav.registry().active_count(), 0);
        assert_eq!(nav.tree().find_by_dom_id(DRAWER_DOM_ID), Some(nav.drawer()));
    }

    #[test]
    fn trigger_click_opens_and_focuses_close_button() {
        let mut nav = NavigationDrawer::default();
        nav.focus_trigger();
        assert_eq!(nav.activate(nav.trigger()), Activation::Opened);
        assert_eq!(nav.tick(), Some(nav.close_button()));
        assert_eq!(nav.focused_label(), Some(CLOSE_LABEL));
        // Second click while open is a no-op.
        assert_eq!(nav.activate(nav.trigger()), Activation::Ignored);
    }

    #[test]
    fn close_button_click_closes_and_restores() {
        let mut nav = NavigationDrawer::default();
        nav.focus_trigger();
        nav.activate(nav.trigger());
        nav.tick();
        assert_eq!(nav.activate(nav.close_button()), Activation::Closed);
        assert_eq!(nav.tick(), Some(nav.trigger()));
        assert_eq!(nav.focused_label(), Some(TRIGGER_LABEL));
    }

    #[test]
    fn click_without_prior_focus_restores_to_trigger() {
        let mut nav = NavigationDrawer::default();
        assert_eq!(nav.focused(), None);
        assert_eq!(nav.activate(nav.trigger()), Activation::Opened);
        assert_eq!(nav.controller().trigger(), Some(nav.trigger()));
        nav.tick();
        nav.dispatch(&key(KeyCode::Escape));
        nav.tick();
        assert_eq!(nav.focused_label(), Some(TRIGGER_LABEL));
    }

    #[test]
    fn click_with_focus_on_logo_restores_to_trigger() {
        let mut nav = NavigationDrawer::default();
        let logo = nav.logo();
        nav.tree_mut().focus(logo);
        nav.activate(nav.trigger());
        nav.tick();
        assert_eq!(nav.focused_label(), Some(CLOSE_LABEL));
        nav.dispatch(&key(KeyCode::Escape));
        nav.tick();
        assert_eq!(nav.focused_label(), Some(TRIGGER_LABEL));
    }

    #[test]
    fn clicking_an_element_focuses_it() {
        let mut nav = NavigationDrawer::default();
        nav.activate(nav.logo());
        assert_eq!(nav.focused(), Some(nav.logo()));

        nav.activate(nav.trigger());
        nav.tick();
        let home = nav.link_ids()[0];
        nav.activate(home);
        // The link took focus, then closing hands it back to the trigger.
        assert!(!nav.is_open());
        assert_eq!(nav.tick(), Some(nav.trigger()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "append under missing parent")]
    fn append_under_removed_parent_asserts() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let gone = append(&mut tree, root, ElementNode::container());
        let _ = tree.remove(gone);
        append(&mut tree, gone, ElementNode::button("orphan"));
    }

    #[test]
    fn closed_drawer_elements_cannot_be_activated() {
        let mut nav = NavigationDrawer::default();
        let home = nav.link_ids()[0];
        assert_eq!(nav.activate(home), Activation::Ignored);
        assert_eq!(nav.activate(nav.close_button()), Activation::Ignored);
    }

    #[test]
    fn drawer_link_navigates_and_closes() {
        let mut nav = NavigationDrawer::default();
        nav.focus_trigger();
        nav.open();
        nav.tick();
        let home = nav.link_ids()[0];
        assert_eq!(
            nav.activate(home),
            Activation::Navigated { href: "/".into() }
        );
        assert!(!nav.is_open());
        assert_eq!(nav.tick(), Some(nav.trigger()));
    }

    #[test]
    fn drawer_link_can_stay_open() {
        let mut nav = NavigationDrawer::new(
            DrawerConfig::default().close_on_link_activate(false),
            [NavLink::new("Docs", "/docs")],
        );
        nav.open();
        let docs = nav.link_ids()[0];
        assert_eq!(
            nav.activate(docs),
            Activation::Navigated {
                href: "/docs".into()
            }
        );
        assert!(nav.is_open());
    }

    #[test]
    fn logo_link_navigates_without_touching_drawer() {
        let mut nav = NavigationDrawer::default();
        assert_eq!(
            nav.activate(nav.logo()),
            Activation::Navigated { href: "/".into() }
        );
        assert!(!nav.is_open());
    }

    #[test]
    fn enter_on_trigger_opens() {
        let mut nav = NavigationDrawer::default();
        nav.focus_trigger();
        let outcome = nav.dispatch(&key(KeyCode::Enter));
        assert_eq!(outcome.activation, Some(Activation::Opened));
        assert!(nav.is_open());
    }

    #[test]
    fn space_activates_buttons_only() {
        let mut nav = NavigationDrawer::default();
        nav.focus_trigger();
        nav.open();
        nav.tick();
        let outcome = nav.dispatch(&key(KeyCode::Char(' ')));
        assert_eq!(outcome.activation, Some(Activation::Closed));

        nav.tick();
        nav.open();
        nav.tick();
        let home = nav.link_ids()[0];
        nav.tree_mut().focus(home);
        let outcome = nav.dispatch(&key(KeyCode::Char(' ')));
        assert_eq!(outcome.activation, None);
        assert!(nav.is_open());
    }

    #[test]
    fn tab_while_closed_uses_native_traversal() {
        let mut nav = NavigationDrawer::default();
        nav.focus_trigger();
        let outcome = nav.dispatch(&key(KeyCode::Tab));
        assert_eq!(outcome.action, TrapAction::Ignored);
        assert!(!outcome.default_prevented);
        assert_eq!(nav.focused(), Some(nav.logo()));
        nav.dispatch(&key(KeyCode::Tab));
        assert_eq!(nav.focused(), Some(nav.trigger()));
    }

    #[test]
    fn focus_events_are_ignored() {
        let mut nav = NavigationDrawer::default();
        nav.open();
        assert_eq!(nav.dispatch(&Event::Focus(false)), DispatchOutcome::ignored());
        assert!(nav.is_open());
    }

    #[test]
    fn a11y_snapshot_tracks_state() {
        let mut nav = NavigationDrawer::default();
        nav.focus_trigger();
        let closed = nav.a11y_snapshot();
        assert!(!closed.expanded);
        assert!(!closed.drawer_visible);
        assert_eq!(closed.controls, DRAWER_DOM_ID);
        assert_eq!(closed.focused.as_deref(), Some(TRIGGER_LABEL));

        nav.open();
        nav.tick();
        let open = nav.a11y_snapshot();
        assert!(open.expanded);
        assert!(open.drawer_visible);
        assert_eq!(open.drawer_label, DRAWER_LABEL);
        assert_eq!(open.focused.as_deref(), Some(CLOSE_LABEL));
    }

    #[test]
    fn remove_link_only_touches_links() {
        let mut nav = NavigationDrawer::default();
        assert!(nav.remove_link(nav.close_button()).is_none());
        let home = nav.link_ids()[0];
        assert_eq!(nav.remove_link(home), Some(NavLink::new("Home", "/")));
        assert!(nav.link_ids().is_empty());
        assert!(nav.tree().get(home).is_none());
    }

    #[test]
    fn shift_tab_from_close_button_wraps_to_last_link() {
        let mut nav = NavigationDrawer::new(
            DrawerConfig::default(),
            [NavLink::new("Home", "/"), NavLink::new("About", "/about")],
        );
        nav.focus_trigger();
        nav.open();
        nav.tick();
        let outcome = nav.dispatch(&Event::Key(
            KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT),
        ));
        assert!(outcome.default_prevented);
        assert_eq!(nav.focused(), Some(nav.link_ids()[1]));
    }
}
