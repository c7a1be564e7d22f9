//! Cart snapshots from `GET /cart.js` and the free-shipping progress derived
//! from them.
//!
//! The cart JSON is written by the platform but themes and apps inject line
//! items too, so field types are not trusted:
//!
//! - `requires_shipping` / `gift_card` only count when they are the JSON
//!   boolean `true`. `"true"`, `1` and friends do not.
//! - `final_line_price` is coerced numerically: numbers and numeric strings
//!   count, anything else is `0`.
//! - A missing or non-array `items` is an empty cart.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::money::MoneyFormatter;

/// Placeholder in a progress message replaced by the missing amount.
pub const AMOUNT_TOKEN: &str = "[[amount]]";
/// Progress message used when none is configured.
pub const DEFAULT_PROGRESS_MESSAGE: &str = "Noch [[amount]]";

/// A freshly fetched cart. Never cached between refreshes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CartSnapshot {
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<CartItem>,
}

/// The fields of a cart line the progress element cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CartItem {
    /// Line total after discounts, in minor units.
    #[serde(default, deserialize_with = "coerced_minor_units")]
    pub final_line_price: i64,

    #[serde(default, deserialize_with = "strict_true")]
    pub requires_shipping: bool,

    #[serde(default, deserialize_with = "strict_true")]
    pub gift_card: bool,
}

impl CartItem {
    /// Returns `true` when the line counts toward the free-shipping threshold.
    #[must_use]
    pub fn is_shippable(&self) -> bool {
        self.requires_shipping && !self.gift_card
    }
}

/// Sum of `final_line_price` over lines that require shipping and are not
/// gift cards. Saturates at the `i64` bounds.
#[must_use]
pub fn shippable_subtotal(cart: &CartSnapshot) -> i64 {
    cart.items
        .iter()
        .filter(|item| item.is_shippable())
        .map(|item| item.final_line_price)
        .fold(0i64, i64::saturating_add)
}

/// What the progress element should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingProgress {
    /// Amount (minor units) substituted into the message.
    pub amount: i64,
    /// Fill width and `aria-valuenow`, `0..=100`.
    pub percent: u8,
}

impl ShippingProgress {
    /// Progress toward `threshold` given the shippable `subtotal`.
    ///
    /// - empty cart (`subtotal <= 0`): full threshold, 0%;
    /// - threshold reached: zero amount, 100%;
    /// - otherwise: the remaining amount and `floor(subtotal / threshold * 100)`
    ///   clamped to `0..=100`.
    ///
    /// `threshold` must be non-zero; callers skip rendering otherwise.
    #[must_use]
    pub fn compute(threshold: i64, subtotal: i64) -> Self {
        if subtotal <= 0 {
            return Self {
                amount: threshold,
                percent: 0,
            };
        }

        let remaining = threshold.saturating_sub(subtotal).max(0);
        if remaining == 0 {
            return Self {
                amount: 0,
                percent: 100,
            };
        }

        let ratio = (i128::from(subtotal) * 100).div_euclid(i128::from(threshold));
        let percent = u8::try_from(ratio.clamp(0, 100)).unwrap_or(100);
        Self {
            amount: remaining,
            percent,
        }
    }

    /// `template` with its first [`AMOUNT_TOKEN`] replaced by the formatted
    /// amount. Later tokens are left as written.
    #[must_use]
    pub fn message(&self, template: &str, money: &MoneyFormatter) -> String {
        template.replacen(AMOUNT_TOKEN, &money.format(self.amount), 1)
    }
}

fn lenient_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<CartItem>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let Value::Array(entries) = raw else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<CartItem>(entry).ok())
        .collect())
}

fn strict_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

#[allow(clippy::cast_possible_truncation)]
fn coerced_minor_units<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        Value::Bool(b) => Some(i64::from(b)),
        _ => None,
    };
    Ok(number.unwrap_or(0))
}
