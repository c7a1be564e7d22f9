//! Shared fixtures: an in-memory cart API and page builders.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use serde_json::{json, Value};
use storefront_client::ClientError;
use storefront_core::CartSnapshot;
use storefront_widgets::{CartApi, Node, Page};

/// Cart API double that counts calls and returns canned results.
#[derive(Debug, Default)]
pub struct FakeCart {
    cart: RefCell<Option<Value>>,
    add_response: RefCell<Option<Value>>,
    pub fetches: Cell<usize>,
    pub adds: Cell<usize>,
    pub last_add: RefCell<Vec<(String, String)>>,
}

impl FakeCart {
    /// A cart whose `GET /cart.js` returns `cart`; adds succeed.
    pub fn with_cart(cart: Value) -> Self {
        let fake = Self::default();
        fake.set_cart(Some(cart));
        fake.set_add_response(Some(json!({ "id": 1, "quantity": 1 })));
        fake
    }

    /// A cart whose every request fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// `None` makes fetches fail with a 503.
    pub fn set_cart(&self, cart: Option<Value>) {
        *self.cart.borrow_mut() = cart;
    }

    /// `None` makes adds fail with a 422.
    pub fn set_add_response(&self, response: Option<Value>) {
        *self.add_response.borrow_mut() = response;
    }
}

impl CartApi for FakeCart {
    async fn fetch_cart(&self) -> Result<CartSnapshot, ClientError> {
        self.fetches.set(self.fetches.get() + 1);
        let cart = self.cart.borrow().clone();
        match cart {
            Some(cart) => serde_json::from_value(cart).map_err(|source| ClientError::Deserialize {
                context: "fake cart".to_owned(),
                source,
            }),
            None => Err(ClientError::UnexpectedStatus {
                status: 503,
                url: "http://fake/cart.js".to_owned(),
            }),
        }
    }

    async fn add_to_cart(&self, fields: &[(String, String)]) -> Result<Value, ClientError> {
        self.adds.set(self.adds.get() + 1);
        *self.last_add.borrow_mut() = fields.to_vec();
        self.add_response
            .borrow()
            .clone()
            .ok_or_else(|| ClientError::UnexpectedStatus {
                status: 422,
                url: "http://fake/cart/add.js".to_owned(),
            })
    }
}

/// One shippable line of `cents`.
pub fn line(cents: i64) -> Value {
    json!({ "final_line_price": cents, "requires_shipping": true, "gift_card": false })
}

pub fn cart_of(items: Vec<Value>) -> Value {
    json!({ "items": items })
}

pub fn variants_json() -> String {
    json!([
        {
            "id": 101, "title": "Rot / M", "public_title": "Rot / M", "price": 1500,
            "options": ["Rot", "M"], "available": true,
            "featured_image_src": "//cdn.example.com/rot-m.jpg"
        },
        {
            "id": 102, "title": "Blau / L", "public_title": null, "price": 2490,
            "options": ["Blau", "L"], "available": false,
            "featured_image_src": "//cdn.example.com/blau-l.jpg"
        },
        {
            "id": 103, "title": "Blau / M", "public_title": "Blau / M", "price": 150000,
            "options": ["Blau", "M"], "available": true
        }
    ])
    .to_string()
}

/// A cross-sell card with two option selects declared out of order.
pub fn card_node(color: &str, size: &str) -> Node {
    Node::new("div").class("comp-card").children([
        Node::new("script")
            .class("js-variants")
            .attr("type", "application/json")
            .text(&variants_json()),
        Node::new("div")
            .class("comp-media")
            .child(Node::new("img").attr("src", "//cdn.example.com/placeholder.jpg")),
        Node::new("span").class("comp-price"),
        Node::new("form").class("comp-form").children([
            Node::new("select")
                .class("js-option-select")
                .attr("data-index", "1")
                .attr("name", "size")
                .value(size),
            Node::new("select")
                .class("js-option-select")
                .attr("data-index", "0")
                .attr("name", "color")
                .value(color),
            Node::new("input")
                .class("js-variant-id")
                .attr("type", "hidden")
                .attr("name", "id"),
            Node::new("input").attr("name", "quantity").value("1"),
            Node::new("button").class("comp-btn").attr("type", "submit"),
        ]),
    ])
}

/// A volume-discount container with three quantity options.
pub fn volume_node(id: &str) -> Node {
    let option = |variant_id: &str, price: &str| {
        Node::new("label").class("volume-discount-option").child(
            Node::new("input")
                .class("volume-option-input")
                .attr("type", "radio")
                .attr("name", "volume")
                .attr("data-variant-id", variant_id)
                .attr("data-variant-price", price),
        )
    };
    Node::new("div").id(id).children([
        option("201", "19,90 €"),
        option("202", "35,80 €"),
        option("203", "49,90 €"),
    ])
}

/// The theme's main product form and price displays.
pub fn product_page_nodes(product_id: &str) -> Vec<Node> {
    vec![
        Node::new("form").attr("action", "/cart/add").child(
            Node::new("input")
                .attr("type", "hidden")
                .attr("name", "id")
                .value("201"),
        ),
        Node::new("div")
            .id(&format!("product-price-{product_id}"))
            .children([
                Node::new("span").class("price").text("old"),
                Node::new("span").class("price").text("old"),
            ]),
        Node::new("div")
            .class("productView-subtotal")
            .child(Node::new("span").class("money-subtotal").text("old")),
        Node::new("div").attr("data-price-wrapper", "").child(
            Node::new("div")
                .class("price__regular")
                .child(Node::new("span").class("price-item--regular").text("old")),
        ),
        Node::new("div").attr("data-price-wrapper", "").child(
            Node::new("div")
                .class("price__regular")
                .child(Node::new("span").class("price-item--regular").text("old")),
        ),
        Node::new("span").attr("data-zwischensumme", "").text("old"),
    ]
}

/// A page whose body holds `nodes`.
pub fn page_with(nodes: impl IntoIterator<Item = Node>) -> Page {
    let mut page = Page::default();
    let body = page.document.body();
    for node in nodes {
        page.document.append(body, node);
    }
    page
}
