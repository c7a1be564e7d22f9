/// Runtime settings for talking to a storefront and formatting its money.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Origin of the storefront, e.g. `https://shop.example.com`. The cart
    /// endpoints are resolved against it.
    pub base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// BCP 47 tag used by the fallback money formatter (`de-DE`, `en-US`, ...).
    pub locale: String,
    /// ISO 4217 code used when the page declares no active currency.
    pub currency: String,
}
