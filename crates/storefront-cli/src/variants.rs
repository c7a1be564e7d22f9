//! `resolve-variant`: which variant a card shows for a given selection.

use std::path::Path;

use anyhow::Context;
use storefront_core::{format_card_price, parse_variant_list, resolve_variant, Fallback, Selection, Variant};

/// Picks a variant the way a card does: hidden id when given, otherwise
/// the positional option match, falling back to the first variant.
pub(crate) fn pick<'v>(variants: &'v [Variant], options: &[String], id: Option<&str>) -> Option<&'v Variant> {
    let selection = match id {
        Some(id) => Selection::HiddenId(id),
        None => Selection::Options(options),
    };
    resolve_variant(variants, selection, Fallback::FirstVariant)
}

pub(crate) fn run_resolve_variant(path: &Path, options: &[String], id: Option<&str>) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read variant list {}", path.display()))?;
    let variants = parse_variant_list(Some(&raw));
    if variants.is_empty() {
        anyhow::bail!("{} holds no usable variants", path.display());
    }

    let variant = pick(&variants, options, id).context("no variant resolved")?;
    let summary = serde_json::json!({
        "id": variant.id,
        "title": variant.title,
        "price": format_card_price(variant.price),
        "available": variant.available,
        "image": variant.featured_image_src,
        "alt": variant.image_alt(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
