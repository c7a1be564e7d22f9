//! Pure storefront logic shared by the widgets and the client: variant
//! resolution, cart snapshots and shipping progress, money formatting, the
//! volume-discount configuration, and environment-driven app configuration.

pub mod app_config;
pub mod cart;
pub mod config;
pub mod error;
pub mod money;
pub mod variant;
pub mod volume;

pub use app_config::StorefrontConfig;
pub use cart::{
    shippable_subtotal, CartItem, CartSnapshot, ShippingProgress, AMOUNT_TOKEN,
    DEFAULT_PROGRESS_MESSAGE,
};
pub use config::{load_storefront_config, load_storefront_config_from_env};
pub use error::ConfigError;
pub use money::{format_card_price, MoneyFormatter};
pub use variant::{parse_variant_list, resolve_variant, Fallback, Selection, Variant, VariantId};
pub use volume::{VolumeDiscountConfig, VolumeDiscountOverrides};
