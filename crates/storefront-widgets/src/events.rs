//! Page event vocabulary and the listener registry.
//!
//! Widgets never call each other. They dispatch [`PageEvent`]s onto the page
//! and the runtime routes each event to whatever registered for it on the
//! document. Registration is deduplicated: registering the same
//! `(event, listener)` pair twice is a no-op, which is how the progress
//! elements share a single set of cart listeners no matter how many of them
//! are mounted.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::dom::ElementId;

/// Emitted by a cross-sell card after a successful add (`detail.variant`).
pub const VARIANT_ADDED: &str = "variant:added";
/// Consumed by volume-discount containers (`detail.variant.id`).
///
/// Cards do not emit this event; see [`VARIANT_ADDED`].
pub const VARIANT_CHANGED: &str = "variant:changed";
/// Bubbling request for cart-dependent UI to refresh.
pub const CART_REFRESH: &str = "cart:refresh";
/// Theme-level notification that the cart changed.
pub const CART_UPDATED: &str = "cart:updated";
/// Bubbling notification from a volume-discount option change.
pub const VOLUME_VARIANT_CHANGE: &str = "volumediscount:variantchange";
/// Native-style change notification on a form control.
pub const CHANGE: &str = "change";

/// Where an event is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Document,
    Element(ElementId),
}

/// A dispatched custom or synthetic event.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEvent {
    pub name: String,
    pub target: EventTarget,
    pub bubbles: bool,
    pub detail: Value,
}

impl PageEvent {
    /// A non-bubbling event dispatched on the document.
    #[must_use]
    pub fn on_document(name: &str, detail: Value) -> Self {
        Self {
            name: name.to_owned(),
            target: EventTarget::Document,
            bubbles: false,
            detail,
        }
    }

    /// An event dispatched on an element.
    #[must_use]
    pub fn on_element(name: &str, element: ElementId, bubbles: bool, detail: Value) -> Self {
        Self {
            name: name.to_owned(),
            target: EventTarget::Element(element),
            bubbles,
            detail,
        }
    }

    /// Returns `true` if document-level listeners observe this event.
    #[must_use]
    pub fn reaches_document(&self) -> bool {
        matches!(self.target, EventTarget::Document) || self.bubbles
    }

    #[must_use]
    pub fn target_element(&self) -> Option<ElementId> {
        match self.target {
            EventTarget::Element(e) => Some(e),
            EventTarget::Document => None,
        }
    }
}

/// A document-level listener, identified by who it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Listener {
    /// Refreshes every mounted shipping progress element.
    ProgressBars,
    /// Syncs the volume-discount container rooted at this element.
    VolumeDiscount(ElementId),
}

/// Document-level listener registry with registration deduplication.
#[derive(Debug, Default)]
pub struct EventBus {
    subscriptions: BTreeSet<(String, Listener)>,
}

impl EventBus {
    /// Registers `listener` for `event`.
    ///
    /// Returns `false` (and changes nothing) if that pair is already
    /// registered.
    pub fn subscribe(&mut self, event: &str, listener: Listener) -> bool {
        self.subscriptions.insert((event.to_owned(), listener))
    }

    /// Removes every registration of `listener`.
    pub fn unsubscribe_all(&mut self, listener: Listener) {
        self.subscriptions.retain(|(_, l)| *l != listener);
    }

    #[must_use]
    pub fn is_subscribed(&self, event: &str, listener: Listener) -> bool {
        self.subscriptions.contains(&(event.to_owned(), listener))
    }

    /// Listeners that observe `event` at the document, in registration-key
    /// order.
    #[must_use]
    pub fn listeners_for(&self, event: &PageEvent) -> Vec<Listener> {
        if !event.reaches_document() {
            return Vec::new();
        }
        self.subscriptions
            .iter()
            .filter(|(name, _)| *name == event.name)
            .map(|(_, listener)| *listener)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
