//! Per-qualifying-item field extraction.
//!
//! Every field has a fallback chain ending in a default, so extraction of
//! an item is total: a sparse or mangled item container degrades to
//! sentinel values instead of dropping the popup.

use scraper::{ElementRef, Selector};

use dealscout_core::{DealRecord, OfferContext, PRICE_UNAVAILABLE, SIZE_NOT_APPLICABLE};

use super::{element_text, has_class, size::derive_size};

/// Name shown when an item container has no readable description.
const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Builds one qualifying-item record from its container element.
pub(super) fn parse_qualifying_item(card: ElementRef<'_>, offer: &OfferContext) -> DealRecord {
    let name = item_name(card);
    let competitor_price = sale_price(card);
    let original_price = original_price(card);
    let product_size = item_size(card, &name);

    DealRecord {
        competitor_product: name,
        competitor_price,
        original_price,
        offer_description: offer.offer_description.clone(),
        offer_source: offer.offer_source.clone(),
        source_url: offer.source_url.clone(),
        product_size,
        offer_event: offer.offer_event.clone(),
        competitor_name: offer.competitor_name.clone(),
        is_qualifying_item: true,
    }
}

/// Item name: description label first, then bold/medium text spans.
fn item_name(card: ElementRef<'_>) -> String {
    let description = Selector::parse("span[data-testid='cart-page-item-description']")
        .expect("valid selector");
    if let Some(label) = card.select(&description).next() {
        let text = element_text(label);
        if !text.is_empty() {
            return text;
        }
    }

    let span = Selector::parse("span").expect("valid selector");
    card.select(&span)
        .filter(|s| has_class(*s, "kds-Text--m") || has_class(*s, "kds-Text--bold"))
        .map(element_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_owned())
}

/// Sale price: promotional marker first, then the generic price-data
/// element, then the sentinel.
fn sale_price(card: ElementRef<'_>) -> String {
    let promo = Selector::parse("mark.kds-Price-promotional").expect("valid selector");
    if let Some(price) = card.select(&promo).next() {
        let text = element_text(price);
        if !text.is_empty() {
            return text;
        }
    }

    let data = Selector::parse("data.kds-Price").expect("valid selector");
    card.select(&data)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| PRICE_UNAVAILABLE.to_owned())
}

/// Struck-through original price; empty when the item shows none.
fn original_price(card: ElementRef<'_>) -> String {
    let struck = Selector::parse("s.kds-Price-original").expect("valid selector");
    if let Some(orig) = card.select(&struck).next() {
        return element_text(orig);
    }

    let del = Selector::parse("del").expect("valid selector");
    card.select(&del)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Package size from the sizing label, unless that label is absent or
/// mis-populated with a price (the sizing slot sometimes carries the
/// item's price instead. In that case the size is derived from the item
/// name.
fn item_size(card: ElementRef<'_>, name: &str) -> String {
    let sizing = Selector::parse("span[data-testid='product-item-sizing']")
        .expect("valid selector");
    let raw = card
        .select(&sizing)
        .next()
        .map(element_text)
        .unwrap_or_default();

    if raw.is_empty() || raw.starts_with('$') {
        derive_size(name).unwrap_or_else(|| SIZE_NOT_APPLICABLE.to_owned())
    } else {
        raw
    }
}
