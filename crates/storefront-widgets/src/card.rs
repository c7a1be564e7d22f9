//! Cross-sell product card: option selects drive the displayed variant and
//! the card's own add-to-cart form.
//!
//! ```html
//! <div class="comp-card">
//!   <script class="js-variants" type="application/json">[...]</script>
//!   <div class="comp-media"><img src="..." alt="..."></div>
//!   <span class="comp-price"></span>
//!   <form class="comp-form">
//!     <select class="js-option-select" data-index="0">...</select>
//!     <input class="js-variant-id" type="hidden" name="id">
//!     <button class="comp-btn">Add</button>
//!   </form>
//! </div>
//! ```

use serde_json::json;
use storefront_core::{format_card_price, parse_variant_list, resolve_variant, Fallback, Selection, Variant};

use crate::api::CartApi;
use crate::dom::{Document, ElementId};
use crate::events::{PageEvent, CART_REFRESH, VARIANT_ADDED};
use crate::page::Page;

pub const CARD_SELECTOR: &str = ".comp-card";
const VARIANTS_SELECTOR: &str = ".js-variants";
const OPTION_SELECT_SELECTOR: &str = ".js-option-select";
const VARIANT_ID_SELECTOR: &str = ".js-variant-id";
const PRICE_SELECTOR: &str = ".comp-price";
const IMAGE_SELECTOR: &str = ".comp-media img";
const BUTTON_SELECTOR: &str = ".comp-btn";
const FORM_SELECTOR: &str = ".comp-form";
const MINI_CART_ID: &str = "mini-cart";

/// Result of a card form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submit control was disabled; nothing was sent.
    Blocked,
    /// The store accepted the line; events were dispatched.
    Added,
    /// The request or its response failed; nothing changed on the page.
    Dropped,
}

/// One mounted card.
#[derive(Debug, Clone)]
pub struct VariantCard {
    root: ElementId,
    variants: Vec<Variant>,
    /// Option selects ordered by `data-index`.
    selects: Vec<ElementId>,
    variant_input: Option<ElementId>,
    price: Option<ElementId>,
    image: Option<ElementId>,
    button: Option<ElementId>,
    form: Option<ElementId>,
}

impl VariantCard {
    /// Mounts every card in the document and resolves each once.
    pub fn mount_all(doc: &mut Document) -> Vec<Self> {
        doc.query_all(doc.document_element(), CARD_SELECTOR)
            .into_iter()
            .map(|root| Self::mount(doc, root))
            .collect()
    }

    /// Mounts the card rooted at `root` and applies its initial variant.
    pub fn mount(doc: &mut Document, root: ElementId) -> Self {
        let variants = parse_variant_list(
            doc.query(root, VARIANTS_SELECTOR)
                .map(|node| doc.text(node)),
        );

        let mut selects = doc.query_all(root, OPTION_SELECT_SELECTOR);
        // Stable, so selects without a usable index keep document order.
        selects.sort_by(|a, b| declared_index(doc, *a).total_cmp(&declared_index(doc, *b)));

        let card = Self {
            root,
            variants,
            selects,
            variant_input: doc.query(root, VARIANT_ID_SELECTOR),
            price: doc.query(root, PRICE_SELECTOR),
            image: doc.query(root, IMAGE_SELECTOR),
            button: doc.query(root, BUTTON_SELECTOR),
            form: doc.query(root, FORM_SELECTOR),
        };
        if card.variants.is_empty() {
            tracing::debug!(?root, "card has no variants; staying inert");
        }
        card.update(doc);
        card
    }

    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    #[must_use]
    pub fn owns_select(&self, element: ElementId) -> bool {
        self.selects.contains(&element)
    }

    #[must_use]
    pub fn owns_form(&self, element: ElementId) -> bool {
        self.form == Some(element)
    }

    /// Current option values ordered by the selects' `data-index`.
    #[must_use]
    pub fn selection(&self, doc: &Document) -> Vec<String> {
        self.selects
            .iter()
            .map(|s| doc.value(*s).to_owned())
            .collect()
    }

    /// The variant the card should show.
    ///
    /// Without option selects the hidden id field decides; otherwise the
    /// positional option match. Both fall back to the first variant.
    #[must_use]
    pub fn resolve_variant(&self, doc: &Document) -> Option<&Variant> {
        if self.selects.is_empty() {
            let current = self.variant_input.map_or("", |input| doc.value(input));
            return resolve_variant(
                &self.variants,
                Selection::HiddenId(current),
                Fallback::FirstVariant,
            );
        }
        let selection = self.selection(doc);
        resolve_variant(
            &self.variants,
            Selection::Options(&selection),
            Fallback::FirstVariant,
        )
    }

    /// Reflects `variant` in the card: hidden id, price, image, button.
    pub fn apply_selection(&self, doc: &mut Document, variant: Option<&Variant>) {
        let Some(variant) = variant else {
            return;
        };

        if let Some(input) = self.variant_input {
            doc.set_value(input, variant.id.as_str());
        }
        if let Some(price) = self.price {
            doc.set_text(price, &format_card_price(variant.price));
        }
        if let (Some(image), Some(src)) = (self.image, variant.featured_image_src.as_deref()) {
            doc.set_attribute(image, "src", src);
            doc.set_attribute(image, "alt", variant.image_alt());
        }
        if let Some(button) = self.button {
            doc.set_disabled(button, !variant.available);
        }
    }

    /// Re-resolves after an option select changed.
    pub fn update(&self, doc: &mut Document) {
        if self.variants.is_empty() {
            return;
        }
        let variant = self.resolve_variant(doc);
        self.apply_selection(doc, variant);
    }

    /// Handles a submission of the card's form.
    ///
    /// Native submission is always suppressed. With a disabled submit
    /// control nothing is sent. On success `variant:added` and a bubbling
    /// `cart:refresh` are dispatched and the mini cart is opened. Failures
    /// are dropped.
    pub async fn submit<A: CartApi>(&self, page: &mut Page, api: &A) -> SubmitOutcome {
        if self.button.is_some_and(|b| page.document.disabled(b)) {
            tracing::debug!(card = ?self.root, "submit control disabled; not adding");
            return SubmitOutcome::Blocked;
        }
        let Some(form) = self.form else {
            return SubmitOutcome::Dropped;
        };

        let fields = page.document.form_fields(form);
        let payload = match api.add_to_cart(&fields).await {
            Ok(payload) => payload,
            Err(error) => {
                tracing::debug!(%error, card = ?self.root, "add to cart failed; dropping");
                return SubmitOutcome::Dropped;
            }
        };

        page.dispatch(PageEvent::on_document(
            VARIANT_ADDED,
            json!({ "variant": payload }),
        ));
        let root = page.document.document_element();
        page.dispatch(PageEvent::on_element(
            CART_REFRESH,
            root,
            true,
            serde_json::Value::Null,
        ));
        if let Some(drawer) = page.document.get_element_by_id(MINI_CART_ID) {
            page.document.set_attribute(drawer, "open", "");
        }
        SubmitOutcome::Added
    }
}

/// Numeric `data-index`; missing or unparsable sorts as 0.
fn declared_index(doc: &Document, select: ElementId) -> f64 {
    doc.attribute(select, "data-index")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}
