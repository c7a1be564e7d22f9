//! The page a set of widgets lives on: document, viewport, host globals,
//! listener registry and the queue of dispatched events.
//!
//! The page also keeps a log of the most recent dispatches, at most
//! [`DISPATCH_LOG_CAPACITY`] of them, so callers can see what the widgets
//! announced.

use std::collections::VecDeque;

use storefront_core::MoneyFormatter;

use crate::dom::Document;
use crate::events::{EventBus, PageEvent};

/// Number of recent events kept by [`Page::dispatched`].
pub const DISPATCH_LOG_CAPACITY: usize = 64;

/// Window geometry as the widgets see it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// `innerWidth` in CSS pixels.
    pub width: u32,
    /// `scrollY`; `0.0` means "use the document element's `scrollTop`".
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            scroll_y: 0.0,
        }
    }
}

/// Values the storefront platform exposes on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostGlobals {
    /// The shop's `money_format`, when the platform formatter is loaded.
    pub money_format: Option<String>,
    /// Active presentment currency (`Shopify.currency.active`).
    pub active_currency: Option<String>,
    /// Legacy currency global (`Shopify.Currency.currency`).
    pub legacy_currency: Option<String>,
}

impl HostGlobals {
    /// Active currency, then the legacy global. Empty values are skipped.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        fn non_empty(c: &Option<String>) -> Option<&str> {
            c.as_deref().filter(|c| !c.is_empty())
        }
        non_empty(&self.active_currency).or_else(|| non_empty(&self.legacy_currency))
    }
}

/// A loaded page.
#[derive(Debug, Default)]
pub struct Page {
    pub document: Document,
    pub viewport: Viewport,
    pub host: HostGlobals,
    pub(crate) bus: EventBus,
    pending: VecDeque<PageEvent>,
    dispatched: VecDeque<PageEvent>,
}

impl Page {
    #[must_use]
    pub fn new(document: Document, viewport: Viewport, host: HostGlobals) -> Self {
        Self {
            document,
            viewport,
            host,
            ..Self::default()
        }
    }

    /// Queues `event` for routing and records it in the dispatch log,
    /// evicting the oldest entry once the log is full.
    pub fn dispatch(&mut self, event: PageEvent) {
        tracing::debug!(event = %event.name, bubbles = event.bubbles, "dispatch");
        if self.dispatched.len() == DISPATCH_LOG_CAPACITY {
            self.dispatched.pop_front();
        }
        self.dispatched.push_back(event.clone());
        self.pending.push_back(event);
    }

    pub(crate) fn next_pending(&mut self) -> Option<PageEvent> {
        self.pending.pop_front()
    }

    /// Recently dispatched events, oldest first.
    #[must_use]
    pub fn dispatched(&self) -> &VecDeque<PageEvent> {
        &self.dispatched
    }

    /// Names of dispatched events, oldest first.
    #[must_use]
    pub fn dispatched_names(&self) -> Vec<&str> {
        self.dispatched.iter().map(|e| e.name.as_str()).collect()
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Scroll offset: `scroll_y`, or the document element's `scrollTop` when
    /// `scroll_y` is zero.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        if self.viewport.scroll_y == 0.0 {
            self.document.scroll_top()
        } else {
            self.viewport.scroll_y
        }
    }

    /// Money formatter for this page: host template, document language,
    /// host currency.
    #[must_use]
    pub fn money_formatter(&self) -> MoneyFormatter {
        MoneyFormatter::new(
            self.host.money_format.as_deref(),
            self.document.lang(),
            self.host.currency(),
        )
    }
}
