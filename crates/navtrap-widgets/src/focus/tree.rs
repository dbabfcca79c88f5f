#![forbid(unsafe_code)]

//! In-process element tree acting as the UI runtime for focus.
//!
//! The tree models just enough of a document for keyboard focus: element
//! kinds, parent/child order, mount state, and the attributes that decide
//! focusability.
//!
//! # Invariants
//!
//! 1. Element IDs are never reused within one tree.
//! 2. The root always exists and is always mounted.
//! 3. Removing an element removes its whole subtree.
//! 4. `active_element()` is `None` or names a connected, focusable element:
//!    removing, detaching, hiding, or disabling the focused element blurs it.
//! 5. Traversal order is pre-order (document order) over children in
//!    insertion order.
//!
//! # Focusability
//!
//! An element is *tabbable* (part of sequential Tab order) when it is
//! connected, not hidden (itself or via an ancestor), not disabled, has no
//! negative tab index, and is either a link with an `href`, a button, or
//! carries an explicit tab index. Programmatic focus additionally accepts
//! elements with a negative tab index.

use ahash::AHashMap;

use super::host::{FocusEvent, FocusHost};

/// Opaque handle to an element in an [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Element role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Container,
    Heading,
    Text,
    Button,
    Link { href: Option<String> },
    Custom,
}

/// Element data: kind plus focus-relevant attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub kind: ElementKind,
    /// Accessible name.
    pub label: Option<String>,
    /// Document-level identifier (for `aria-controls` style references).
    pub dom_id: Option<String>,
    pub disabled: bool,
    pub hidden: bool,
    /// Explicit tab index. Negative values leave Tab order but still allow
    /// programmatic focus.
    pub tab_index: Option<i32>,
}

impl ElementNode {
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            label: None,
            dom_id: None,
            disabled: false,
            hidden: false,
            tab_index: None,
        }
    }

    #[must_use]
    pub fn container() -> Self {
        Self::new(ElementKind::Container)
    }

    #[must_use]
    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Heading).with_label(text)
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text).with_label(text)
    }

    #[must_use]
    pub fn button(label: impl Into<String>) -> Self {
        Self::new(ElementKind::Button).with_label(label)
    }

    #[must_use]
    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(ElementKind::Link {
            href: Some(href.into()),
        })
        .with_label(label)
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_dom_id(mut self, dom_id: impl Into<String>) -> Self {
        self.dom_id = Some(dom_id.into());
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn with_tab_index(mut self, idx: i32) -> Self {
        self.tab_index = Some(idx);
        self
    }

    /// Link target, if this is a link.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Link { href } => href.as_deref(),
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        match &self.kind {
            ElementKind::Button => true,
            ElementKind::Link { href } => href.is_some(),
            _ => false,
        }
    }

    fn accepts_focus(&self) -> bool {
        !self.disabled && !self.hidden && (self.is_interactive() || self.tab_index.is_some())
    }

    fn in_tab_order(&self) -> bool {
        self.accepts_focus() && self.tab_index.is_none_or(|idx| idx >= 0)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: ElementNode,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    mounted: bool,
}

/// Number of undrained focus events an [`ElementTree`] retains.
pub const FOCUS_EVENT_CAPACITY: usize = 256;

/// Element tree with focus tracking.
#[derive(Debug)]
pub struct ElementTree {
    slots: AHashMap<ElementId, Slot>,
    root: ElementId,
    next_id: u32,
    active: Option<ElementId>,
    events: Vec<FocusEvent>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// Create a tree holding only a mounted root container.
    #[must_use]
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut slots = AHashMap::new();
        slots.insert(
            root,
            Slot {
                node: ElementNode::container(),
                parent: None,
                children: Vec::new(),
                mounted: true,
            },
        );
        Self {
            slots,
            root,
            next_id: 1,
            active: None,
            events: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: the root is permanent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    // --- Structure ---

    /// Append `node` as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn insert(&mut self, parent: ElementId, node: ElementNode) -> Option<ElementId> {
        if !self.slots.contains_key(&parent) {
            return None;
        }
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.slots.insert(
            id,
            Slot {
                node,
                parent: Some(parent),
                children: Vec::new(),
                mounted: true,
            },
        );
        if let Some(slot) = self.slots.get_mut(&parent) {
            slot.children.push(id);
        }
        Some(id)
    }

    /// Remove an element and its subtree. The root cannot be removed.
    #[must_use = "use the removed node (if any)"]
    pub fn remove(&mut self, id: ElementId) -> Option<ElementNode> {
        if id == self.root {
            return None;
        }
        let parent = self.slots.get(&id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.slots.get_mut(&p)) {
            parent.children.retain(|&child| child != id);
        }
        let subtree = self.subtree(id);
        if self.active.is_some_and(|a| subtree.contains(&a)) {
            self.blur();
        }
        let mut removed = None;
        for member in subtree {
            let slot = self.slots.remove(&member);
            if member == id {
                removed = slot.map(|s| s.node);
            }
        }
        removed
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        self.slots.get(&id).map(|s| &s.node)
    }

    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.slots.get(&id).and_then(|s| s.parent)
    }

    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.slots.get(&id).map_or(&[], |s| s.children.as_slice())
    }

    /// Inclusive containment: an element contains itself.
    #[must_use]
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return self.slots.contains_key(&current);
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Find the first element (document order) with the given `dom_id`.
    #[must_use]
    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<ElementId> {
        self.subtree(self.root).into_iter().find(|id| {
            self.get(*id)
                .and_then(|n| n.dom_id.as_deref())
                .is_some_and(|d| d == dom_id)
        })
    }

    // --- Attributes ---

    /// Set the disabled flag. Blurs the element if it loses focusability.
    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.node.disabled = disabled;
        }
        self.revalidate_active();
    }

    /// Set the hidden flag. Hiding an element hides its subtree.
    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.node.hidden = hidden;
        }
        self.revalidate_active();
    }

    /// Set the explicit tab index (`None` clears it).
    pub fn set_tab_index(&mut self, id: ElementId, tab_index: Option<i32>) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.node.tab_index = tab_index;
        }
        self.revalidate_active();
    }

    /// Whether the element and all its ancestors exist and are mounted.
    #[must_use]
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.ancestry_all(id, |slot| slot.mounted)
    }

    fn is_visible(&self, id: ElementId) -> bool {
        self.ancestry_all(id, |slot| slot.mounted && !slot.node.hidden)
    }

    fn ancestry_all(&self, id: ElementId, pred: impl Fn(&Slot) -> bool) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(slot) = self.slots.get(&current) else {
                return false;
            };
            if !pred(slot) {
                return false;
            }
            cursor = slot.parent;
        }
        true
    }

    /// Whether the element participates in sequential Tab order.
    #[must_use]
    pub fn is_tabbable(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(ElementNode::in_tab_order) && self.is_visible(id)
    }

    // --- Focus ---

    #[inline]
    #[must_use]
    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    /// Remove focus from the current element.
    pub fn blur(&mut self) -> Option<ElementId> {
        let prev = self.active.take();
        if let Some(id) = prev {
            self.record(FocusEvent::FocusLost { id });
        }
        prev
    }

    /// Move focus one step through the document's Tab order, wrapping at
    /// either end. This is the runtime's native traversal used when no
    /// listener suppresses the default action.
    pub fn tab_traverse(&mut self, forward: bool) -> Option<ElementId> {
        let order = self.focusable_within(self.root);
        if order.is_empty() {
            return None;
        }
        let position = self
            .active
            .and_then(|active| order.iter().position(|&id| id == active));
        let target = match (position, forward) {
            (None, true) => order[0],
            (None, false) => order[order.len() - 1],
            (Some(i), true) => order[(i + 1) % order.len()],
            (Some(i), false) => order[(i + order.len() - 1) % order.len()],
        };
        self.focus(target).then_some(target)
    }

    /// Drain recorded focus events in the order they happened.
    ///
    /// At most [`FOCUS_EVENT_CAPACITY`] events are kept; older ones are
    /// discarded when nobody drains the log.
    pub fn take_focus_events(&mut self) -> Vec<FocusEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded focus events not yet drained.
    #[must_use]
    pub fn focus_events(&self) -> &[FocusEvent] {
        &self.events
    }

    fn record(&mut self, event: FocusEvent) {
        if self.events.len() >= FOCUS_EVENT_CAPACITY {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    fn revalidate_active(&mut self) {
        if let Some(active) = self.active
            && !self.can_focus(active)
        {
            self.blur();
        }
    }

    fn subtree(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        if !self.slots.contains_key(&root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            // Reverse so the first child is visited first.
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }
}

impl FocusHost for ElementTree {
    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn focus(&mut self, id: ElementId) -> bool {
        if !self.can_focus(id) {
            return false;
        }
        let prev = self.active;
        if prev == Some(id) {
            return true;
        }
        self.active = Some(id);
        self.record(match prev {
            Some(from) => FocusEvent::FocusMoved { from, to: id },
            None => FocusEvent::FocusGained { id },
        });
        true
    }

    fn can_focus(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(ElementNode::accepts_focus) && self.is_visible(id)
    }

    fn focusable_within(&self, root: ElementId) -> Vec<ElementId> {
        if !self.is_visible(root) {
            return Vec::new();
        }
        self.subtree(root)
            .into_iter()
            .filter(|&id| id != root && self.is_tabbable(id))
            .collect()
    }

    fn set_mounted(&mut self, id: ElementId, mounted: bool) {
        if id == self.root {
            return;
        }
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.mounted = mounted;
        }
        self.revalidate_active();
    }

    fn is_mounted(&self, id: ElementId) -> bool {
        self.is_connected(id)
    }
}
