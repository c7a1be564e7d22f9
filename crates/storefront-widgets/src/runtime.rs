//! Drives every widget on one page.
//!
//! The runtime owns the page and the cart API. User actions enter through
//! its methods; each one mutates the document, possibly dispatches events,
//! and then drains the page's event queue, routing every event to the
//! widgets that observe it. Everything runs on the caller's task.

use storefront_core::VolumeDiscountOverrides;

use crate::api::CartApi;
use crate::card::{SubmitOutcome, VariantCard};
use crate::dom::ElementId;
use crate::events::{Listener, PageEvent, CHANGE};
use crate::page::Page;
use crate::progress::{ProgressBars, LIMIT_ATTRIBUTE, MESSAGE_ATTRIBUTE};
use crate::toggle::{ScrollToggle, ToggleSettings};
use crate::volume::{VolumeDiscount, VolumeDiscountOptions};

#[derive(Debug)]
pub struct Storefront<A> {
    page: Page,
    api: A,
    cards: Vec<VariantCard>,
    toggle: Option<ScrollToggle>,
    bars: ProgressBars,
    volumes: Vec<VolumeDiscount>,
}

impl<A: CartApi> Storefront<A> {
    /// Mounts every widget found on `page`, renders the progress elements
    /// once and settles any events that produced.
    pub async fn boot(page: Page, api: A, settings: &ToggleSettings) -> Self {
        let mut storefront = Self {
            page,
            api,
            cards: Vec::new(),
            toggle: None,
            bars: ProgressBars::default(),
            volumes: Vec::new(),
        };

        storefront.cards = VariantCard::mount_all(&mut storefront.page.document);
        storefront.toggle = ScrollToggle::mount(&mut storefront.page, settings);
        storefront.volumes = VolumeDiscount::auto_init(&mut storefront.page);
        storefront.bars.mount_all(&mut storefront.page);
        storefront
            .bars
            .refresh_all(&mut storefront.page, &storefront.api)
            .await;
        storefront.pump().await;

        tracing::info!(
            cards = storefront.cards.len(),
            progress_bars = storefront.bars.len(),
            volume_discounts = storefront.volumes.len(),
            toggle = storefront.toggle.is_some(),
            "storefront widgets mounted"
        );
        storefront
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Direct page access for setup; no events are routed.
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn cards(&self) -> &[VariantCard] {
        &self.cards
    }

    #[must_use]
    pub fn toggle(&self) -> Option<&ScrollToggle> {
        self.toggle.as_ref()
    }

    #[must_use]
    pub fn progress_bars(&self) -> &ProgressBars {
        &self.bars
    }

    #[must_use]
    pub fn volume_discounts(&self) -> &[VolumeDiscount] {
        &self.volumes
    }

    /// Initializes the volume-discount container with `container_id`,
    /// replacing an earlier instance on the same element.
    pub fn init_volume_discount(&mut self, container_id: &str, options: VolumeDiscountOptions) -> bool {
        let Some(volume) = VolumeDiscount::init(&mut self.page, container_id, options) else {
            return false;
        };
        self.volumes.retain(|v| v.container() != volume.container());
        self.volumes.push(volume);
        true
    }

    /// [`Self::init_volume_discount`] with plain overrides.
    pub fn init_volume_discount_with(&mut self, container_id: &str, overrides: VolumeDiscountOverrides) -> bool {
        self.init_volume_discount(container_id, VolumeDiscountOptions::with_overrides(overrides))
    }

    /// Selects `variant_id` in the container rooted at `container`.
    pub fn update_volume_selection(&mut self, container: ElementId, variant_id: &str) -> bool {
        let Some(volume) = self.volumes.iter().find(|v| v.container() == container) else {
            return false;
        };
        volume.update_selection(&mut self.page.document, variant_id);
        true
    }

    /// Mounts `<progress-bar>` elements added since boot and renders them.
    pub async fn connect_progress_bars(&mut self) -> usize {
        let added = self.bars.mount_all(&mut self.page);
        for host in &added {
            self.bars.refresh_one(&mut self.page, &self.api, *host).await;
        }
        self.pump().await;
        added.len()
    }

    /// The user picks `value` in a select.
    pub async fn select_option(&mut self, select: ElementId, value: &str) {
        self.page.document.set_value(select, value);
        self.page
            .dispatch(PageEvent::on_element(CHANGE, select, true, serde_json::Value::Null));
        self.pump().await;
    }

    /// The user clicks a radio option: same-name radios are unchecked first.
    pub async fn choose_volume_option(&mut self, input: ElementId) {
        let doc = &mut self.page.document;
        if let Some(name) = doc.attribute(input, "name").map(str::to_owned) {
            let root = doc.document_element();
            for other in doc.query_all(root, &format!("input[name=\"{name}\"]")) {
                doc.set_checked(other, false);
            }
        }
        doc.set_checked(input, true);
        self.page
            .dispatch(PageEvent::on_element(CHANGE, input, true, serde_json::Value::Null));
        self.pump().await;
    }

    /// The user submits `form`. Returns `None` when no card owns the form.
    pub async fn submit(&mut self, form: ElementId) -> Option<SubmitOutcome> {
        let card = self.cards.iter().find(|c| c.owns_form(form))?;
        let outcome = card.submit(&mut self.page, &self.api).await;
        self.pump().await;
        Some(outcome)
    }

    /// The window scrolls to `scroll_y`.
    pub fn scroll(&mut self, scroll_y: f64) {
        self.page.viewport.scroll_y = scroll_y;
        if let Some(toggle) = &self.toggle {
            toggle.on_scroll(&mut self.page);
        }
    }

    /// Sets an attribute the way page scripts would. Writing an observed
    /// attribute of a mounted progress element re-renders it, even when the
    /// value is unchanged.
    pub async fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        self.page.document.set_attribute(element, name, value);

        let observed = matches!(name, LIMIT_ATTRIBUTE | MESSAGE_ATTRIBUTE);
        if observed && self.bars.get(element).is_some() {
            self.bars
                .refresh_one(&mut self.page, &self.api, element)
                .await;
        }
        self.pump().await;
    }

    /// Dispatches an event from outside the widgets (theme scripts).
    pub async fn dispatch(&mut self, event: PageEvent) {
        self.page.dispatch(event);
        self.pump().await;
    }

    /// Routes queued events until the queue is empty.
    async fn pump(&mut self) {
        while let Some(event) = self.page.next_pending() {
            if event.name == CHANGE {
                if let Some(target) = event.target_element() {
                    self.route_change(target);
                }
            }

            for listener in self.page.bus.listeners_for(&event) {
                match listener {
                    Listener::ProgressBars => {
                        self.bars.refresh_all(&mut self.page, &self.api).await;
                    }
                    Listener::VolumeDiscount(container) => {
                        if let Some(volume) = self.volumes.iter().find(|v| v.container() == container) {
                            volume.on_variant_changed(&mut self.page.document, &event.detail);
                        }
                    }
                }
            }
        }
    }

    fn route_change(&mut self, target: ElementId) {
        for card in self.cards.iter().filter(|c| c.owns_select(target)) {
            card.update(&mut self.page.document);
        }
        for volume in self.volumes.iter().filter(|v| v.owns_input(target)) {
            volume.on_option_change(&mut self.page, target);
        }
    }
}
