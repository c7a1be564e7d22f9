//! Product variants embedded in cross-sell cards and the rules that pick one
//! from the shopper's option selection.
//!
//! ## Embedded shape
//!
//! Themes serialize `product.variants` straight into the card, so the list
//! carries Shopify's storefront fields:
//!
//! ```json
//! [{"id": 4711, "title": "Rot / M", "public_title": "Rot / M",
//!   "price": 2490, "options": ["Rot", "M"], "available": true,
//!   "featured_image_src": "//cdn.example.com/rot.jpg"}]
//! ```
//!
//! `id` arrives as a JSON number from Liquid but as a string from a form
//! field, so [`VariantId`] compares loosely. `price` is in minor units.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Variant identifier that tolerates number/string mismatch.
///
/// `4711` and `"4711"` are the same id; so are `"4711"` and `" 4711 "`.
#[derive(Debug, Clone, Eq)]
pub struct VariantId(String);

impl VariantId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Loose equality against a raw form value.
    ///
    /// Trims both sides; when both parse as numbers they are compared
    /// numerically so `"10"` matches `"10.0"`.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        let (a, b) = (self.0.trim(), raw.trim());
        if a == b {
            return true;
        }
        match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => (x - y).abs() < f64::EPSILON,
            _ => false,
        }
    }
}

impl PartialEq for VariantId {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for VariantId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for VariantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl<'de> Deserialize<'de> for VariantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Unsigned(u64),
            Float(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self(n.to_string()),
            Raw::Unsigned(n) => Self(n.to_string()),
            Raw::Float(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

impl Serialize for VariantId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A purchasable variant as embedded in a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,

    #[serde(default)]
    pub title: String,

    /// Option values joined for display, e.g. `"Rot / M"`. Shopify sends
    /// `null` for single-variant products.
    #[serde(default)]
    pub public_title: Option<String>,

    /// Price in minor currency units.
    #[serde(default)]
    pub price: i64,

    /// Option values, positionally aligned with the card's option selects.
    #[serde(default)]
    pub options: Vec<String>,

    /// Missing availability is treated as sold out.
    #[serde(default)]
    pub available: bool,

    #[serde(default)]
    pub featured_image_src: Option<String>,
}

impl Variant {
    /// Alt text for the featured image: the public title, else the title.
    #[must_use]
    pub fn image_alt(&self) -> &str {
        self.public_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }

    /// Returns `true` when every selected value equals the option at the same
    /// position.
    #[must_use]
    pub fn matches_selection(&self, selection: &[String]) -> bool {
        selection
            .iter()
            .enumerate()
            .all(|(i, value)| self.options.get(i) == Some(value))
    }
}

/// What the shopper has chosen on a card.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    /// The card has no option selects; only its hidden id field is known.
    HiddenId(&'a str),
    /// Option values ordered by the selects' declared index.
    Options(&'a [String]),
}

/// What to return when nothing matches the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    /// The first variant in the embedded list. Cards always use this.
    #[default]
    FirstVariant,
    /// No variant at all.
    Nothing,
}

/// Picks the variant for a selection.
///
/// - [`Selection::HiddenId`]: the variant whose id loosely equals the value.
/// - [`Selection::Options`]: the first variant whose options match
///   positionally.
///
/// When nothing matches, `fallback` decides. An empty list always yields
/// `None`.
#[must_use]
pub fn resolve_variant<'v>(
    variants: &'v [Variant],
    selection: Selection<'_>,
    fallback: Fallback,
) -> Option<&'v Variant> {
    let found = match selection {
        Selection::HiddenId(raw) => variants.iter().find(|v| v.id.matches(raw)),
        Selection::Options(values) => variants.iter().find(|v| v.matches_selection(values)),
    };

    found.or_else(|| match fallback {
        Fallback::FirstVariant => variants.first(),
        Fallback::Nothing => None,
    })
}

/// Parses the JSON text embedded in a card.
///
/// Absent text yields an empty list. Malformed JSON is logged and also
/// yields an empty list, which leaves the card inert.
#[must_use]
pub fn parse_variant_list(text: Option<&str>) -> Vec<Variant> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Variant>>(text) {
        Ok(variants) => variants,
        Err(error) => {
            tracing::warn!(%error, "embedded variant JSON is malformed; card stays inert");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "variant_test.rs"]
mod tests;
