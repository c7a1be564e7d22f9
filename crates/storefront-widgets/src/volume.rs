//! Volume-discount selector: a group of radio options, one per quantity
//! variant, that drives the page's main add-to-cart form and price displays.

use std::fmt;

use serde_json::{json, Value};
use storefront_core::{VolumeDiscountConfig, VolumeDiscountOverrides};

use crate::dom::{Document, ElementId};
use crate::events::{Listener, PageEvent, CHANGE, VARIANT_CHANGED, VOLUME_VARIANT_CHANGE};
use crate::page::Page;

pub const AUTO_INIT_ATTRIBUTE: &str = "data-volume-discount-auto-init";
pub const OPTION_SELECTOR: &str = ".volume-discount-option";
pub const INPUT_SELECTOR: &str = ".volume-option-input";
const SELECTED_CLASS: &str = "selected";
const BORDER_CLASS: &str = "has-selected-border";
const PRODUCT_FORM_SELECTOR: &str = "form[action*=\"/cart/add\"]";
const PRODUCT_FORM_FIELD_SELECTOR: &str = "input[name=\"id\"], select[name=\"id\"]";

/// Where a selected option's price is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTarget {
    /// Every match inside `#product-price-{product_id}`; skipped without a
    /// product id.
    ProductBlock(&'static str),
    /// The first match in the document.
    First(&'static str),
    /// The first match inside each element matching `wrapper`.
    FirstInEach {
        wrapper: &'static str,
        target: &'static str,
    },
}

/// Price displays overwritten on every selection, in write order.
pub const PRICE_TARGETS: &[PriceTarget] = &[
    PriceTarget::ProductBlock(".price"),
    PriceTarget::First(".productView-subtotal .money-subtotal"),
    PriceTarget::FirstInEach {
        wrapper: "[data-price-wrapper]",
        target: ".price__regular .price-item--regular",
    },
    PriceTarget::First(".price__container .price-item--regular"),
    PriceTarget::First("[data-zwischensumme]"),
];

/// Passed to the variant-change callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantChange {
    pub variant_id: String,
    /// Display price exactly as stored on the option.
    pub variant_price: String,
}

pub type VariantChangeCallback = Box<dyn Fn(&VariantChange)>;

/// Options accepted by [`VolumeDiscount::init`].
#[derive(Default)]
pub struct VolumeDiscountOptions {
    pub overrides: VolumeDiscountOverrides,
    pub on_variant_change: Option<VariantChangeCallback>,
}

impl VolumeDiscountOptions {
    #[must_use]
    pub fn with_overrides(overrides: VolumeDiscountOverrides) -> Self {
        Self {
            overrides,
            on_variant_change: None,
        }
    }

    #[must_use]
    pub fn on_variant_change(mut self, callback: impl Fn(&VariantChange) + 'static) -> Self {
        self.on_variant_change = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for VolumeDiscountOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeDiscountOptions")
            .field("overrides", &self.overrides)
            .field("on_variant_change", &self.on_variant_change.is_some())
            .finish()
    }
}

/// An initialized volume-discount container.
pub struct VolumeDiscount {
    container: ElementId,
    config: VolumeDiscountConfig,
    inputs: Vec<ElementId>,
    on_variant_change: Option<VariantChangeCallback>,
}

impl fmt::Debug for VolumeDiscount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeDiscount")
            .field("container", &self.container)
            .field("config", &self.config)
            .field("inputs", &self.inputs)
            .field("on_variant_change", &self.on_variant_change.is_some())
            .finish()
    }
}

impl VolumeDiscount {
    /// Styles the container with `id`, binds its option inputs and starts
    /// listening for `variant:changed`.
    ///
    /// Returns `None` (with a warning) when no such element exists.
    pub fn init(page: &mut Page, container_id: &str, options: VolumeDiscountOptions) -> Option<Self> {
        let Some(container) = page.document.get_element_by_id(container_id) else {
            tracing::warn!(container_id, "volume discount container not found");
            return None;
        };

        let config = VolumeDiscountConfig::merged(options.overrides);
        let doc = &mut page.document;
        for (property, value) in config.css_properties() {
            doc.set_style(container, property, &value);
        }
        if config.enable_selected_border {
            for option in doc.query_all(container, OPTION_SELECTOR) {
                doc.add_class(option, BORDER_CLASS);
            }
        }
        let inputs = doc.query_all(container, INPUT_SELECTOR);

        page.bus
            .subscribe(VARIANT_CHANGED, Listener::VolumeDiscount(container));
        tracing::debug!(container_id, options = inputs.len(), "volume discount initialized");

        Some(Self {
            container,
            config,
            inputs,
            on_variant_change: options.on_variant_change,
        })
    }

    /// Initializes every element carrying `data-volume-discount-auto-init`
    /// from its `data-*` attributes. Elements without an `id` are skipped.
    pub fn auto_init(page: &mut Page) -> Vec<Self> {
        let root = page.document.document_element();
        let selector = format!("[{AUTO_INIT_ATTRIBUTE}]");
        let elements = page.document.query_all(root, &selector);

        elements
            .into_iter()
            .filter_map(|element| {
                let doc = &page.document;
                let overrides = VolumeDiscountOverrides::from_attributes(|name| {
                    doc.attribute(element, name).map(str::to_owned)
                });
                let Some(id) = doc.attribute(element, "id").filter(|id| !id.is_empty()) else {
                    tracing::warn!(element = ?element, "volume discount auto-init element has no id");
                    return None;
                };
                let id = id.to_owned();
                Self::init(page, &id, VolumeDiscountOptions::with_overrides(overrides))
            })
            .collect()
    }

    #[must_use]
    pub fn container(&self) -> ElementId {
        self.container
    }

    #[must_use]
    pub fn config(&self) -> &VolumeDiscountConfig {
        &self.config
    }

    #[must_use]
    pub fn owns_input(&self, element: ElementId) -> bool {
        self.inputs.contains(&element)
    }

    /// Handles a `change` on one of the container's option inputs.
    pub fn on_option_change(&self, page: &mut Page, input: ElementId) {
        if !self.owns_input(input) {
            return;
        }
        self.mark_selected(&mut page.document, Some(input));

        let variant_id = page
            .document
            .attribute(input, "data-variant-id")
            .unwrap_or_default()
            .to_owned();
        let variant_price = page
            .document
            .attribute(input, "data-variant-price")
            .unwrap_or_default()
            .to_owned();

        update_product_form(page, &variant_id);
        overwrite_prices(
            &mut page.document,
            self.config.product_id.as_deref(),
            &variant_price,
        );
        page.dispatch(PageEvent {
            bubbles: true,
            ..PageEvent::on_document(
                VOLUME_VARIANT_CHANGE,
                json!({ "variant": { "id": variant_id, "price": variant_price } }),
            )
        });

        if let Some(callback) = &self.on_variant_change {
            callback(&VariantChange {
                variant_id,
                variant_price,
            });
        }
    }

    /// Checks the option whose `data-variant-id` equals `variant_id` and
    /// unchecks the rest. The checked option's price is written to the page
    /// using the container's `data-product-id`. An unknown id leaves every
    /// option unchecked and writes nothing.
    pub fn update_selection(&self, doc: &mut Document, variant_id: &str) {
        let mut chosen = None;
        for input in &self.inputs {
            let is_match = doc.attribute(*input, "data-variant-id") == Some(variant_id);
            doc.set_checked(*input, is_match);
            if is_match && chosen.is_none() {
                chosen = Some(*input);
            }
        }
        self.mark_selected(doc, chosen);

        let Some(input) = chosen else {
            tracing::debug!(variant_id, container = ?self.container, "no volume option for variant");
            return;
        };
        let price = doc
            .attribute(input, "data-variant-price")
            .unwrap_or_default()
            .to_owned();
        let product_id = doc
            .attribute(self.container, "data-product-id")
            .filter(|id| !id.is_empty())
            .map(str::to_owned);
        overwrite_prices(doc, product_id.as_deref(), &price);
    }

    /// Handles a `variant:changed` event seen at the document.
    pub fn on_variant_changed(&self, doc: &mut Document, detail: &Value) {
        if let Some(id) = variant_id_from_detail(detail) {
            self.update_selection(doc, &id);
        }
    }

    /// Gives `input`'s wrapper the `selected` class and takes it from every
    /// other wrapper in the container.
    fn mark_selected(&self, doc: &mut Document, input: Option<ElementId>) {
        let wrapper = input.and_then(|i| doc.closest(i, OPTION_SELECTOR));
        for option in doc.query_all(self.container, OPTION_SELECTOR) {
            if Some(option) == wrapper {
                doc.add_class(option, SELECTED_CLASS);
            } else {
                doc.remove_class(option, SELECTED_CLASS);
            }
        }
    }
}

/// `detail.variant.id` as a string; numbers and strings are accepted.
#[must_use]
pub fn variant_id_from_detail(detail: &Value) -> Option<String> {
    match detail.get("variant")?.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Points the page's main add-to-cart form at `variant_id` and notifies it.
fn update_product_form(page: &mut Page, variant_id: &str) {
    let root = page.document.document_element();
    let Some(form) = page.document.query(root, PRODUCT_FORM_SELECTOR) else {
        tracing::warn!("product form not found");
        return;
    };
    let Some(field) = page.document.query(form, PRODUCT_FORM_FIELD_SELECTOR) else {
        return;
    };
    page.document.set_value(field, variant_id);
    page.dispatch(PageEvent::on_element(CHANGE, field, true, Value::Null));
}

/// Writes `price` verbatim into every [`PRICE_TARGETS`] entry present.
pub fn overwrite_prices(doc: &mut Document, product_id: Option<&str>, price: &str) {
    let root = doc.document_element();
    let mut targets = Vec::new();
    for target in PRICE_TARGETS {
        match *target {
            PriceTarget::ProductBlock(selector) => {
                let block = product_id
                    .and_then(|id| doc.get_element_by_id(&format!("product-price-{id}")));
                if let Some(block) = block {
                    targets.extend(doc.query_all(block, selector));
                }
            }
            PriceTarget::First(selector) => targets.extend(doc.query(root, selector)),
            PriceTarget::FirstInEach { wrapper, target } => {
                for scope in doc.query_all(root, wrapper) {
                    targets.extend(doc.query(scope, target));
                }
            }
        }
    }
    for element in targets {
        doc.set_text(element, price);
    }
}
