//! Configuration of the volume-discount selector.
//!
//! A container is configured once at init from fixed defaults plus caller
//! overrides; override fields left as `None` fall through to the default.

/// Resolved configuration of one volume-discount container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeDiscountConfig {
    pub radio_default_color: String,
    pub radio_selected_color: String,
    pub option_bg_color: String,
    pub option_bg_selected_color: String,
    pub option_bg_hover_color: String,
    pub enable_selected_border: bool,
    /// Border thickness in pixels.
    pub selected_border_thickness: i64,
    pub selected_border_color: String,
    /// Product whose `#product-price-{id}` block receives price updates.
    pub product_id: Option<String>,
}

impl Default for VolumeDiscountConfig {
    fn default() -> Self {
        Self {
            radio_default_color: "#004f9f".to_owned(),
            radio_selected_color: "#004f9f".to_owned(),
            option_bg_color: "#f9f9f7".to_owned(),
            option_bg_selected_color: "#e2e1e7".to_owned(),
            option_bg_hover_color: "#f0f0ee".to_owned(),
            enable_selected_border: false,
            selected_border_thickness: 2,
            selected_border_color: "#004f9f".to_owned(),
            product_id: None,
        }
    }
}

impl VolumeDiscountConfig {
    /// Defaults with `overrides` applied; later wins.
    #[must_use]
    pub fn merged(overrides: VolumeDiscountOverrides) -> Self {
        let d = Self::default();
        Self {
            radio_default_color: overrides.radio_default_color.unwrap_or(d.radio_default_color),
            radio_selected_color: overrides
                .radio_selected_color
                .unwrap_or(d.radio_selected_color),
            option_bg_color: overrides.option_bg_color.unwrap_or(d.option_bg_color),
            option_bg_selected_color: overrides
                .option_bg_selected_color
                .unwrap_or(d.option_bg_selected_color),
            option_bg_hover_color: overrides
                .option_bg_hover_color
                .unwrap_or(d.option_bg_hover_color),
            enable_selected_border: overrides
                .enable_selected_border
                .unwrap_or(d.enable_selected_border),
            selected_border_thickness: overrides
                .selected_border_thickness
                .unwrap_or(d.selected_border_thickness),
            selected_border_color: overrides
                .selected_border_color
                .unwrap_or(d.selected_border_color),
            product_id: overrides.product_id.or(d.product_id),
        }
    }

    /// CSS custom properties written onto the container, in write order.
    #[must_use]
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--radio-default-color", self.radio_default_color.clone()),
            ("--radio-selected-color", self.radio_selected_color.clone()),
            ("--option-bg-color", self.option_bg_color.clone()),
            ("--option-bg-selected-color", self.option_bg_selected_color.clone()),
            ("--option-bg-hover-color", self.option_bg_hover_color.clone()),
            (
                "--selected-border-thickness",
                format!("{}px", self.selected_border_thickness),
            ),
            ("--selected-border-color", self.selected_border_color.clone()),
        ]
    }
}

/// Caller-supplied overrides. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeDiscountOverrides {
    pub radio_default_color: Option<String>,
    pub radio_selected_color: Option<String>,
    pub option_bg_color: Option<String>,
    pub option_bg_selected_color: Option<String>,
    pub option_bg_hover_color: Option<String>,
    pub enable_selected_border: Option<bool>,
    pub selected_border_thickness: Option<i64>,
    pub selected_border_color: Option<String>,
    pub product_id: Option<String>,
}

impl VolumeDiscountOverrides {
    /// Reads overrides from an auto-init element's `data-*` attributes.
    ///
    /// Empty strings count as absent. `data-enable-selected-border` is on
    /// only for the literal `"true"`. `data-selected-border-thickness` takes
    /// the leading integer (`"3px"` → 3); zero or unparsable means default.
    pub fn from_attributes<F>(attribute: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str| attribute(name).filter(|v| !v.is_empty());

        Self {
            radio_default_color: text("data-radio-default-color"),
            radio_selected_color: text("data-radio-selected-color"),
            option_bg_color: text("data-option-bg-color"),
            option_bg_selected_color: text("data-option-bg-selected-color"),
            option_bg_hover_color: text("data-option-bg-hover-color"),
            enable_selected_border: Some(
                attribute("data-enable-selected-border").as_deref() == Some("true"),
            ),
            selected_border_thickness: text("data-selected-border-thickness")
                .as_deref()
                .and_then(parse_leading_int)
                .filter(|n| *n != 0),
            selected_border_color: text("data-selected-border-color"),
            product_id: text("data-product-id"),
        }
    }
}

/// Parses an optional sign and the digits that follow leading whitespace.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let value = digits.parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
