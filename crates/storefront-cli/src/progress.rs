//! `cart-progress`: what a `<progress-bar>` would show for the live cart.

use storefront_client::CartClient;
use storefront_core::{shippable_subtotal, MoneyFormatter, ShippingProgress, StorefrontConfig};

pub(crate) async fn run_cart_progress(
    config: &StorefrontConfig,
    threshold: i64,
    template: &str,
    money_format: Option<&str>,
) -> anyhow::Result<()> {
    if threshold <= 0 {
        anyhow::bail!("--threshold must be a positive amount in minor units");
    }

    let client = CartClient::from_config(config)?;
    tracing::info!(base_url = %config.base_url, threshold, "fetching cart");
    let cart = client.fetch_cart().await?;

    let subtotal = shippable_subtotal(&cart);
    let progress = ShippingProgress::compute(threshold, subtotal);
    let money = MoneyFormatter::new(money_format, Some(&config.locale), Some(&config.currency));

    println!("{}", progress.message(template, &money));
    println!(
        "{}% ({} of {} shippable line(s), subtotal {})",
        progress.percent,
        cart.items.iter().filter(|i| i.is_shippable()).count(),
        cart.items.len(),
        money.format(subtotal),
    );
    Ok(())
}
