//! `<progress-bar>` elements showing how far the cart is from free shipping.
//!
//! Each element is configured by two observed attributes:
//!
//! - `data-limit`: threshold in minor units; absent or zero disables it,
//! - `data-message`: message template, `[[amount]]` is replaced by the
//!   formatted amount still missing (default `"Noch [[amount]]"`).
//!
//! Mounted elements share one pair of document listeners (`cart:updated`,
//! `cart:refresh`) that refresh all of them.

pub use storefront_core::{AMOUNT_TOKEN, DEFAULT_PROGRESS_MESSAGE as DEFAULT_MESSAGE};
use storefront_core::{shippable_subtotal, MoneyFormatter, ShippingProgress};

use crate::api::CartApi;
use crate::dom::{Document, ElementId, Node};
use crate::events::{Listener, CART_REFRESH, CART_UPDATED};
use crate::page::Page;

pub const PROGRESS_BAR_TAG: &str = "progress-bar";
pub const LIMIT_ATTRIBUTE: &str = "data-limit";
pub const MESSAGE_ATTRIBUTE: &str = "data-message";

/// Lifecycle of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Uninitialized,
    Refreshing,
    Rendered,
}

/// Result of a single refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No threshold configured; nothing fetched.
    Disabled,
    /// The cart could not be fetched; the previous render stays.
    Dropped,
    Rendered(ShippingProgress),
}

/// One mounted `<progress-bar>`.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    host: ElementId,
    message: ElementId,
    track: ElementId,
    fill: ElementId,
    state: RefreshState,
}

impl ProgressBar {
    /// Renders the element's inner structure under `host`.
    pub fn mount(doc: &mut Document, host: ElementId) -> Self {
        let container = doc.append(
            host,
            Node::new("div")
                .class("progress-bar__container")
                .attr("role", "region")
                .attr("aria-label", "Shipping progress"),
        );
        let message = doc.append(
            container,
            Node::new("p")
                .class("progress-bar__message")
                .attr("aria-live", "polite"),
        );
        let track = doc.append(
            container,
            Node::new("div")
                .class("progress-bar__track")
                .attr("role", "progressbar")
                .attr("aria-valuemin", "0")
                .attr("aria-valuemax", "100"),
        );
        let fill = doc.append(track, Node::new("div").class("progress-bar__fill"));

        Self {
            host,
            message,
            track,
            fill,
            state: RefreshState::Uninitialized,
        }
    }

    #[must_use]
    pub fn host(&self) -> ElementId {
        self.host
    }

    #[must_use]
    pub fn state(&self) -> RefreshState {
        self.state
    }

    #[must_use]
    pub fn message_element(&self) -> ElementId {
        self.message
    }

    #[must_use]
    pub fn track_element(&self) -> ElementId {
        self.track
    }

    #[must_use]
    pub fn fill_element(&self) -> ElementId {
        self.fill
    }

    /// Threshold from `data-limit`; absent, non-numeric or non-finite is 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn threshold(&self, doc: &Document) -> i64 {
        doc.attribute(self.host, LIMIT_ATTRIBUTE)
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .map_or(0, |n| n as i64)
    }

    /// Template from `data-message`, or the default when absent or empty.
    #[must_use]
    pub fn template<'d>(&self, doc: &'d Document) -> &'d str {
        doc.attribute(self.host, MESSAGE_ATTRIBUTE)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MESSAGE)
    }

    /// Writes message, fill width and `aria-valuenow` for `progress`.
    pub fn render(&self, doc: &mut Document, progress: ShippingProgress, money: &MoneyFormatter) {
        let message = progress.message(self.template(doc), money);
        doc.set_text(self.message, &message);
        doc.set_style(self.fill, "width", &format!("{}%", progress.percent));
        doc.set_attribute(self.track, "aria-valuenow", &progress.percent.to_string());
    }

    /// Fetches the cart and re-renders.
    ///
    /// Concurrent refreshes are not fenced; whichever finishes last wins.
    pub async fn refresh<A: CartApi>(&mut self, page: &mut Page, api: &A) -> RefreshOutcome {
        let threshold = self.threshold(&page.document);
        if threshold == 0 {
            return RefreshOutcome::Disabled;
        }

        let previous = self.state;
        self.state = RefreshState::Refreshing;
        let cart = match api.fetch_cart().await {
            Ok(cart) => cart,
            Err(error) => {
                tracing::debug!(%error, host = ?self.host, "cart fetch failed; keeping previous render");
                self.state = previous;
                return RefreshOutcome::Dropped;
            }
        };

        let progress = ShippingProgress::compute(threshold, shippable_subtotal(&cart));
        let money = page.money_formatter();
        self.render(&mut page.document, progress, &money);
        self.state = RefreshState::Rendered;
        tracing::debug!(host = ?self.host, amount = progress.amount, percent = progress.percent, "progress rendered");
        RefreshOutcome::Rendered(progress)
    }
}

/// Every `<progress-bar>` mounted on a page.
#[derive(Debug, Default)]
pub struct ProgressBars {
    bars: Vec<ProgressBar>,
}

impl ProgressBars {
    /// Mounts every `<progress-bar>` not mounted yet and makes sure the
    /// shared cart listeners are registered. Returns the newly mounted hosts.
    pub fn mount_all(&mut self, page: &mut Page) -> Vec<ElementId> {
        let hosts = page
            .document
            .query_all(page.document.document_element(), PROGRESS_BAR_TAG);
        hosts
            .into_iter()
            .filter(|host| self.mount(page, *host))
            .collect()
    }

    /// Mounts the element at `host`. Returns `false` if it was already
    /// mounted.
    pub fn mount(&mut self, page: &mut Page, host: ElementId) -> bool {
        if self.get(host).is_some() {
            return false;
        }
        self.bars.push(ProgressBar::mount(&mut page.document, host));
        Self::bind_cart_events(page);
        true
    }

    /// Registers the shared cart listeners. Only the first call per page
    /// registers anything; returns whether it did.
    pub fn bind_cart_events(page: &mut Page) -> bool {
        let updated = page.bus.subscribe(CART_UPDATED, Listener::ProgressBars);
        let refresh = page.bus.subscribe(CART_REFRESH, Listener::ProgressBars);
        updated || refresh
    }

    /// Removes the shared cart listeners.
    pub fn unbind_cart_events(page: &mut Page) {
        page.bus.unsubscribe_all(Listener::ProgressBars);
    }

    #[must_use]
    pub fn get(&self, host: ElementId) -> Option<&ProgressBar> {
        self.bars.iter().find(|b| b.host == host)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Refreshes the element at `host`, if mounted.
    pub async fn refresh_one<A: CartApi>(
        &mut self,
        page: &mut Page,
        api: &A,
        host: ElementId,
    ) -> Option<RefreshOutcome> {
        let bar = self.bars.iter_mut().find(|b| b.host == host)?;
        Some(bar.refresh(page, api).await)
    }

    /// Refreshes every mounted element, one after another.
    pub async fn refresh_all<A: CartApi>(&mut self, page: &mut Page, api: &A) {
        for bar in &mut self.bars {
            bar.refresh(page, api).await;
        }
    }
}
