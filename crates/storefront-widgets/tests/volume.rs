//! Volume-discount selector behavior.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{page_with, product_page_nodes, volume_node, FakeCart};
use serde_json::json;
use storefront_core::VolumeDiscountOverrides;
use storefront_widgets::volume::AUTO_INIT_ATTRIBUTE;
use storefront_widgets::{
    ElementId, Node, Page, Storefront, ToggleSettings, VariantChange, VolumeDiscount,
    VolumeDiscountOptions,
};

fn option_input(page: &Page, variant_id: &str) -> ElementId {
    let doc = &page.document;
    doc.query(
        doc.body(),
        &format!(".volume-option-input[data-variant-id=\"{variant_id}\"]"),
    )
    .expect("option present")
}

fn selected_wrappers(page: &Page) -> Vec<ElementId> {
    let doc = &page.document;
    doc.query_all(doc.body(), ".volume-discount-option.selected")
}

fn texts(page: &Page, css: &str) -> Vec<String> {
    let doc = &page.document;
    doc.query_all(doc.body(), css)
        .into_iter()
        .map(|e| doc.text(e).to_owned())
        .collect()
}

fn product_page() -> Page {
    let mut nodes = vec![volume_node("volume-1")];
    nodes.extend(product_page_nodes("77"));
    page_with(nodes)
}

#[test]
fn init_applies_default_styling() {
    let mut page = product_page();
    let volume = VolumeDiscount::init(&mut page, "volume-1", VolumeDiscountOptions::default())
        .expect("container exists");
    let doc = &page.document;
    let container = volume.container();

    assert_eq!(doc.style(container, "--radio-default-color"), Some("#004f9f"));
    assert_eq!(doc.style(container, "--option-bg-color"), Some("#f9f9f7"));
    assert_eq!(doc.style(container, "--option-bg-selected-color"), Some("#e2e1e7"));
    assert_eq!(doc.style(container, "--option-bg-hover-color"), Some("#f0f0ee"));
    assert_eq!(doc.style(container, "--selected-border-thickness"), Some("2px"));
    assert!(doc
        .query_all(container, ".volume-discount-option.has-selected-border")
        .is_empty());
    assert!(page
        .bus()
        .is_subscribed("variant:changed", storefront_widgets::Listener::VolumeDiscount(container)));
}

#[test]
fn init_applies_overrides_and_border() {
    let mut page = product_page();
    let overrides = VolumeDiscountOverrides {
        option_bg_color: Some("#fff".to_owned()),
        enable_selected_border: Some(true),
        selected_border_thickness: Some(4),
        ..VolumeDiscountOverrides::default()
    };
    let volume = VolumeDiscount::init(
        &mut page,
        "volume-1",
        VolumeDiscountOptions::with_overrides(overrides),
    )
    .unwrap();
    let doc = &page.document;

    assert_eq!(doc.style(volume.container(), "--option-bg-color"), Some("#fff"));
    assert_eq!(doc.style(volume.container(), "--radio-selected-color"), Some("#004f9f"));
    assert_eq!(doc.style(volume.container(), "--selected-border-thickness"), Some("4px"));
    assert_eq!(
        doc.query_all(volume.container(), ".volume-discount-option.has-selected-border")
            .len(),
        3
    );
}

#[test]
fn init_with_unknown_container_is_none() {
    let mut page = product_page();
    assert!(VolumeDiscount::init(&mut page, "nope", VolumeDiscountOptions::default()).is_none());
    assert!(page.bus().is_empty());
}

#[tokio::test]
async fn choosing_an_option_updates_form_prices_and_notifies() {
    let mut sf = Storefront::boot(product_page(), FakeCart::default(), &ToggleSettings::default()).await;
    let seen: Rc<RefCell<Vec<VariantChange>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let overrides = VolumeDiscountOverrides {
        product_id: Some("77".to_owned()),
        ..VolumeDiscountOverrides::default()
    };
    assert!(sf.init_volume_discount(
        "volume-1",
        VolumeDiscountOptions::with_overrides(overrides)
            .on_variant_change(move |change| sink.borrow_mut().push(change.clone())),
    ));

    let input = option_input(sf.page(), "202");
    sf.choose_volume_option(input).await;

    let page = sf.page();
    let doc = &page.document;
    assert!(doc.checked(input));
    let wrapper = doc.closest(input, ".volume-discount-option").unwrap();
    assert_eq!(selected_wrappers(page), vec![wrapper]);

    let field = doc.query(doc.body(), r#"form[action*="/cart/add"] input[name="id"]"#).unwrap();
    assert_eq!(doc.value(field), "202");

    assert_eq!(texts(page, "#product-price-77 .price"), vec!["35,80 €", "35,80 €"]);
    assert_eq!(texts(page, ".money-subtotal"), vec!["35,80 €"]);
    assert_eq!(texts(page, ".price-item--regular"), vec!["35,80 €", "35,80 €"]);
    assert_eq!(texts(page, "[data-zwischensumme]"), vec!["35,80 €"]);

    let names = page.dispatched_names();
    assert_eq!(names, vec!["change", "change", "volumediscount:variantchange"]);
    let notice = &page.dispatched()[2];
    assert!(notice.bubbles);
    assert_eq!(
        notice.detail,
        json!({ "variant": { "id": "202", "price": "35,80 €" } })
    );

    assert_eq!(
        *seen.borrow(),
        vec![VariantChange {
            variant_id: "202".to_owned(),
            variant_price: "35,80 €".to_owned(),
        }]
    );
}

#[tokio::test]
async fn switching_options_moves_the_selection() {
    let mut sf = Storefront::boot(product_page(), FakeCart::default(), &ToggleSettings::default()).await;
    sf.init_volume_discount("volume-1", VolumeDiscountOptions::default());

    let first = option_input(sf.page(), "201");
    let third = option_input(sf.page(), "203");
    sf.choose_volume_option(first).await;
    sf.choose_volume_option(third).await;

    let doc = &sf.page().document;
    assert!(!doc.checked(first));
    assert!(doc.checked(third));
    assert_eq!(
        selected_wrappers(sf.page()),
        vec![doc.closest(third, ".volume-discount-option").unwrap()]
    );
    // Without a product id the product block is left alone.
    assert_eq!(texts(sf.page(), "#product-price-77 .price"), vec!["old", "old"]);
    assert_eq!(texts(sf.page(), ".money-subtotal"), vec!["49,90 €"]);
}

#[tokio::test]
async fn missing_product_form_still_updates_prices() {
    let page = page_with([
        volume_node("volume-1"),
        Node::new("span").attr("data-zwischensumme", "").text("old"),
    ]);
    let mut sf = Storefront::boot(page, FakeCart::default(), &ToggleSettings::default()).await;
    sf.init_volume_discount("volume-1", VolumeDiscountOptions::default());

    let input = option_input(sf.page(), "201");
    sf.choose_volume_option(input).await;

    assert_eq!(texts(sf.page(), "[data-zwischensumme]"), vec!["19,90 €"]);
    assert_eq!(
        sf.page().dispatched_names(),
        vec!["change", "volumediscount:variantchange"]
    );
}

#[test]
fn update_selection_checks_by_variant_id() {
    let mut page = product_page();
    let container = page.document.get_element_by_id("volume-1").unwrap();
    page.document.set_attribute(container, "data-product-id", "77");
    let volume = VolumeDiscount::init(&mut page, "volume-1", VolumeDiscountOptions::default()).unwrap();

    volume.update_selection(&mut page.document, "203");

    let third = option_input(&page, "203");
    assert!(page.document.checked(third));
    assert!(!page.document.checked(option_input(&page, "201")));
    assert_eq!(selected_wrappers(&page).len(), 1);
    assert_eq!(texts(&page, "#product-price-77 .price"), vec!["49,90 €", "49,90 €"]);
}

#[test]
fn update_selection_with_unknown_id_clears_and_writes_nothing() {
    let mut page = product_page();
    let volume = VolumeDiscount::init(&mut page, "volume-1", VolumeDiscountOptions::default()).unwrap();
    volume.update_selection(&mut page.document, "202");
    assert_eq!(texts(&page, ".money-subtotal"), vec!["35,80 €"]);

    volume.update_selection(&mut page.document, "999");

    let doc = &page.document;
    assert!(doc
        .query_all(doc.body(), ".volume-option-input")
        .into_iter()
        .all(|input| !doc.checked(input)));
    assert!(selected_wrappers(&page).is_empty());
    assert_eq!(texts(&page, ".money-subtotal"), vec!["35,80 €"]);
}

#[tokio::test]
async fn auto_init_reads_data_attributes() {
    let node = volume_node("volume-auto")
        .attr(AUTO_INIT_ATTRIBUTE, "")
        .attr("data-option-bg-color", "#123456")
        .attr("data-radio-default-color", "")
        .attr("data-enable-selected-border", "true")
        .attr("data-selected-border-thickness", "3px");
    let sf = Storefront::boot(page_with([node]), FakeCart::default(), &ToggleSettings::default()).await;

    assert_eq!(sf.volume_discounts().len(), 1);
    let volume = &sf.volume_discounts()[0];
    let doc = &sf.page().document;
    assert_eq!(doc.style(volume.container(), "--option-bg-color"), Some("#123456"));
    assert_eq!(doc.style(volume.container(), "--radio-default-color"), Some("#004f9f"));
    assert_eq!(doc.style(volume.container(), "--selected-border-thickness"), Some("3px"));
    assert!(volume.config().enable_selected_border);
}

#[tokio::test]
async fn auto_init_ignores_border_flag_other_than_true() {
    let node = volume_node("volume-auto")
        .attr(AUTO_INIT_ATTRIBUTE, "")
        .attr("data-enable-selected-border", "yes")
        .attr("data-selected-border-thickness", "wide");
    let sf = Storefront::boot(page_with([node]), FakeCart::default(), &ToggleSettings::default()).await;
    let volume = &sf.volume_discounts()[0];
    assert!(!volume.config().enable_selected_border);
    assert_eq!(volume.config().selected_border_thickness, 2);
}

#[tokio::test]
async fn auto_init_skips_elements_without_id() {
    let nodes = [
        Node::new("div").id("").class("unrelated"),
        Node::new("section").attr(AUTO_INIT_ATTRIBUTE, ""),
        volume_node("").attr(AUTO_INIT_ATTRIBUTE, ""),
    ];
    let sf = Storefront::boot(page_with(nodes), FakeCart::default(), &ToggleSettings::default()).await;

    assert!(sf.volume_discounts().is_empty());
    let doc = &sf.page().document;
    let unrelated = doc.query(doc.body(), ".unrelated").expect("element present");
    assert_eq!(doc.style(unrelated, "--option-bg-color"), None);
}

#[tokio::test]
async fn runtime_update_selection_targets_one_container() {
    let mut sf = Storefront::boot(product_page(), FakeCart::default(), &ToggleSettings::default()).await;
    let overrides = VolumeDiscountOverrides {
        enable_selected_border: Some(true),
        ..VolumeDiscountOverrides::default()
    };
    assert!(sf.init_volume_discount_with("volume-1", overrides));
    let container = sf.volume_discounts()[0].container();

    assert!(sf.update_volume_selection(container, "201"));
    assert!(sf.page().document.checked(option_input(sf.page(), "201")));
    assert_eq!(texts(sf.page(), "[data-zwischensumme]"), vec!["19,90 €"]);

    let body = sf.page().document.body();
    assert!(!sf.update_volume_selection(body, "201"));
}
