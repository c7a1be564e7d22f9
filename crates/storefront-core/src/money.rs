//! Money rendering for the widgets.
//!
//! Two independent formats are in play:
//!
//! - cross-sell cards use a fixed euro format, `"1500,00 €"`, regardless of
//!   the page locale ([`format_card_price`]);
//! - the shipping progress element prefers the host platform's
//!   `money_format` template and otherwise formats by locale and currency
//!   ([`MoneyFormatter`]).
//!
//! All amounts are integer minor units.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_LOCALE: &str = "de-DE";
pub const DEFAULT_CURRENCY: &str = "EUR";

const NBSP: &str = "\u{a0}";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("valid money placeholder regex"));

/// Formats a card price: two decimals, comma separator, no grouping,
/// trailing `" €"`.
///
/// `0 → "0,00 €"`, `150000 → "1500,00 €"`.
#[must_use]
pub fn format_card_price(cents: i64) -> String {
    let amount = Decimal::new(cents, 2);
    format!("{:.2} €", amount).replace('.', ",")
}

/// Money formatter for the shipping progress message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormatter {
    template: Option<String>,
    locale: String,
    currency: String,
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        Self {
            template: None,
            locale: DEFAULT_LOCALE.to_owned(),
            currency: DEFAULT_CURRENCY.to_owned(),
        }
    }
}

impl MoneyFormatter {
    /// Builds a formatter from what the page exposes.
    ///
    /// `template` is the host platform's `money_format` (e.g.
    /// `"{{amount_with_comma_separator}} €"`). Blank locale or currency
    /// values fall back to `de-DE` / `EUR`.
    #[must_use]
    pub fn new(template: Option<&str>, locale: Option<&str>, currency: Option<&str>) -> Self {
        let pick = |v: Option<&str>, default: &str| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_owned()
        };
        Self {
            template: template.map(str::to_owned),
            locale: pick(locale, DEFAULT_LOCALE),
            currency: pick(currency, DEFAULT_CURRENCY).to_uppercase(),
        }
    }

    /// Formats `cents` with the host template, falling back to locale
    /// formatting when there is no template or it has no usable placeholder.
    #[must_use]
    pub fn format(&self, cents: i64) -> String {
        self.template
            .as_deref()
            .and_then(|t| format_with_template(cents, t))
            .unwrap_or_else(|| format_for_locale(cents, &self.locale, &self.currency))
    }
}

/// Applies a Shopify-style `money_format` template.
///
/// Only the first placeholder is substituted. Returns `None` when the
/// template contains no placeholder. Unknown placeholder names render as an
/// empty amount.
#[must_use]
pub fn format_with_template(cents: i64, template: &str) -> Option<String> {
    let caps = PLACEHOLDER.captures(template)?;
    let value = match &caps[1] {
        "amount" => with_delimiters(cents, 2, ",", "."),
        "amount_no_decimals" => with_delimiters(cents, 0, ",", "."),
        "amount_with_comma_separator" => with_delimiters(cents, 2, ".", ","),
        "amount_no_decimals_with_comma_separator" => with_delimiters(cents, 0, ".", ","),
        "amount_with_apostrophe_separator" => with_delimiters(cents, 2, "'", "."),
        _ => String::new(),
    };
    Some(PLACEHOLDER.replace(template, regex::NoExpand(&value)).into_owned())
}

fn with_delimiters(cents: i64, precision: u32, thousands: &str, decimal: &str) -> String {
    let amount =
        Decimal::new(cents, 2).round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.*}", precision as usize, amount);
    let (sign, unsigned) = split_sign(&fixed);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let mut out = format!("{sign}{}", group_digits(int_part, thousands, 1));
    if !frac_part.is_empty() {
        out.push_str(decimal);
        out.push_str(frac_part);
    }
    out
}

/// Number-formatting conventions of a locale.
struct Conventions {
    group: &'static str,
    decimal: &'static str,
    symbol_first: bool,
    /// Separator between amount and a trailing symbol.
    symbol_gap: &'static str,
    /// Integer digits needed before grouping kicks in, beyond the first group.
    min_grouping: usize,
}

fn conventions(locale: &str) -> Conventions {
    let normalized = locale.replace('_', "-").to_ascii_lowercase();
    if normalized == "de-ch" || normalized == "de-li" {
        return Conventions {
            group: "\u{2019}",
            decimal: ".",
            symbol_first: true,
            symbol_gap: NBSP,
            min_grouping: 1,
        };
    }

    match normalized.split('-').next().unwrap_or_default() {
        "de" | "it" => Conventions {
            group: ".",
            decimal: ",",
            symbol_first: false,
            symbol_gap: NBSP,
            min_grouping: 1,
        },
        "es" => Conventions {
            group: ".",
            decimal: ",",
            symbol_first: false,
            symbol_gap: NBSP,
            min_grouping: 2,
        },
        "fr" => Conventions {
            group: "\u{202f}",
            decimal: ",",
            symbol_first: false,
            symbol_gap: NBSP,
            min_grouping: 1,
        },
        "nl" => Conventions {
            group: ".",
            decimal: ",",
            symbol_first: true,
            symbol_gap: NBSP,
            min_grouping: 1,
        },
        _ => Conventions {
            group: ",",
            decimal: ".",
            symbol_first: true,
            symbol_gap: "",
            min_grouping: 1,
        },
    }
}

fn currency_symbol(currency: &str) -> &str {
    match currency {
        "EUR" => "€",
        "USD" => "$",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

fn fraction_digits(currency: &str) -> u32 {
    match currency {
        "JPY" | "KRW" | "HUF" => 0,
        _ => 2,
    }
}

/// Locale-aware currency formatting, e.g. `("de-DE", "EUR") → "1.234,56 €"`
/// and `("en-US", "USD") → "$1,234.56"`.
#[must_use]
pub fn format_for_locale(cents: i64, locale: &str, currency: &str) -> String {
    let conv = conventions(locale);
    let precision = fraction_digits(currency);
    let amount =
        Decimal::new(cents, 2).round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.*}", precision as usize, amount);
    let (sign, unsigned) = split_sign(&fixed);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut number = group_digits(int_part, conv.group, conv.min_grouping);
    if !frac_part.is_empty() {
        number.push_str(conv.decimal);
        number.push_str(frac_part);
    }

    let symbol = currency_symbol(currency);
    if conv.symbol_first {
        let gap = if conv.symbol_gap.is_empty() && symbol.chars().all(char::is_alphabetic) {
            NBSP
        } else {
            conv.symbol_gap
        };
        format!("{sign}{symbol}{gap}{number}")
    } else {
        format!("{sign}{number}{}{symbol}", conv.symbol_gap)
    }
}

fn split_sign(fixed: &str) -> (&str, &str) {
    match fixed.strip_prefix('-') {
        Some(rest) if rest.bytes().any(|b| b != b'0' && b != b'.') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", fixed),
    }
}

/// Inserts `sep` every three digits from the right. Grouping only applies
/// once the integer part has at least `3 + min_grouping` digits.
fn group_digits(digits: &str, sep: &str, min_grouping: usize) -> String {
    if digits.len() < 3 + min_grouping {
        return digits.to_owned();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * sep.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}
