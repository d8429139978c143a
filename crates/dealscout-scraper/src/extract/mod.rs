//! Popup extractor.
//!
//! Turns one popup's markup snapshot into an ordered sequence of
//! [`DealRecord`]s: the anchor deal first, then one record per qualifying
//! product in document order. A pure function of its inputs: the same
//! snapshot always yields the same records.
//!
//! The site serves two structurally different popups for the same semantic
//! content: a coupon dialog (short-description heading, list-style
//! qualifying products) and a standard deal dialog (dedicated price
//! element, grid-style qualifying products). Classification is a binary
//! best-effort heuristic; ambiguous markup is treated as the standard
//! layout. Extraction is best-effort throughout: a snapshot with no price
//! signal still yields the anchor record with sentinel fields.

mod items;
mod size;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use dealscout_core::{DealRecord, OfferContext, PRICE_UNAVAILABLE, SIZE_NOT_APPLICABLE};

/// Which of the two popup shapes a snapshot uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupLayout {
    /// Coupon dialog: carries a "Sign In To Clip" affordance or the coupon
    /// content-wrapper class.
    Coupon,
    /// Standard deal dialog. Also the default for ambiguous markup.
    Standard,
}

/// Heading that introduces the qualifying-products section in both layouts.
const QUALIFYING_HEADING: &str = "Qualifying Products";

/// Classifies a popup snapshot as coupon or standard layout.
#[must_use]
pub fn classify_layout(html: &str) -> PopupLayout {
    if html.to_lowercase().contains("sign in to clip")
        || html.contains("CouponModal-contentWrapper")
    {
        PopupLayout::Coupon
    } else {
        PopupLayout::Standard
    }
}

/// Parses one popup snapshot into deal records.
///
/// Exactly one returned record is the anchor (`is_qualifying_item =
/// false`); it is always first and always present, even when no price
/// signal can be found. Qualifying items follow in document order.
#[must_use]
pub fn parse_popup(html: &str, displayed_name: &str, offer: &OfferContext) -> Vec<DealRecord> {
    let doc = Html::parse_document(html);
    let layout = classify_layout(html);
    let (competitor_price, original_price) = anchor_prices(&doc, layout);

    let mut records = vec![DealRecord {
        competitor_product: displayed_name.trim().to_owned(),
        competitor_price,
        original_price,
        offer_description: offer.offer_description.clone(),
        offer_source: offer.offer_source.clone(),
        source_url: offer.source_url.clone(),
        product_size: SIZE_NOT_APPLICABLE.to_owned(),
        offer_event: offer.offer_event.clone(),
        competitor_name: offer.competitor_name.clone(),
        is_qualifying_item: false,
    }];

    for card in qualifying_cards(&doc) {
        records.push(items::parse_qualifying_item(card, offer));
    }

    records
}

/// Anchor promotional and original price for the given layout, with
/// sentinels on any miss.
fn anchor_prices(doc: &Html, layout: PopupLayout) -> (String, String) {
    match layout {
        PopupLayout::Coupon => {
            let price = first_text(doc, "h2[data-testid='CouponDetails-shortDescription']")
                .map_or_else(|| PRICE_UNAVAILABLE.to_owned(), |text| coupon_price(&text));
            let original = first_text(doc, "s.kds-Price-original")
                .unwrap_or_else(|| PRICE_UNAVAILABLE.to_owned());
            (price, original)
        }
        PopupLayout::Standard => {
            let price = first_text(doc, "span.SWA-ModalPriceText")
                .unwrap_or_else(|| PRICE_UNAVAILABLE.to_owned());
            let original = first_text(doc, "del")
                .or_else(|| first_text(doc, "s"))
                .unwrap_or_else(|| PRICE_UNAVAILABLE.to_owned());
            (price, original)
        }
    }
}

/// Extracts a price from a coupon short-description like
/// `"Buy 2 Get $5.00 off"` or `"$1.99/lb Chicken Breast"`.
///
/// Falls back to whatever follows the last `$` when the text carries a
/// dollar sign but no well-formed amount.
fn coupon_price(text: &str) -> String {
    let re = Regex::new(r"\$\d+\.?\d*(?:/lb|/ea)?").expect("valid regex");
    if let Some(m) = re.find(text) {
        return m.as_str().to_owned();
    }
    match text.rfind('$') {
        Some(pos) => text[pos + 1..].trim().to_owned(),
        None => PRICE_UNAVAILABLE.to_owned(),
    }
}

/// Locates the qualifying-product item containers, if any.
///
/// Finds the `Qualifying Products` heading, then the nearest following
/// container in document order: a `ul.ProductListView` (coupon layout)
/// first, then a grid div (standard layout). Either may legitimately be
/// absent; many deals have no qualifying-item requirement.
fn qualifying_cards(doc: &Html) -> Vec<ElementRef<'_>> {
    let h2 = Selector::parse("h2").expect("valid selector");
    let Some(heading) = doc
        .select(&h2)
        .find(|h| element_text(*h) == QUALIFYING_HEADING)
    else {
        return Vec::new();
    };

    // List-style container.
    if let Some(list) = first_following(doc, heading, |el| {
        el.value().name() == "ul" && has_class(el, "ProductListView")
    }) {
        let li = Selector::parse("li").expect("valid selector");
        let div = Selector::parse("div").expect("valid selector");
        let cards: Vec<ElementRef<'_>> = list
            .select(&li)
            .filter_map(|item| {
                item.select(&div)
                    .find(|d| has_class(*d, "flex flex-col border-solid"))
            })
            .collect();
        if !cards.is_empty() {
            return cards;
        }
    }

    // Grid-style container.
    if let Some(grid) = first_following(doc, heading, |el| {
        el.value().name() == "div"
            && (has_class(el, "ProductGridContainer")
                || has_class(el, "AutoGrid")
                || has_class(el, "CouponQualifyingProductGridContainer"))
    }) {
        let div = Selector::parse("div").expect("valid selector");
        return grid
            .select(&div)
            .filter(|d| {
                has_class(*d, "MiniProductCard-card-container")
                    || has_class(*d, "flex flex-col border-solid")
            })
            .collect();
    }

    Vec::new()
}

/// First element after `anchor` in document order satisfying `pred`.
fn first_following<'a>(
    doc: &'a Html,
    anchor: ElementRef<'a>,
    pred: impl Fn(ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    let mut past_anchor = false;
    for node in doc.root_element().descendants() {
        if node.id() == anchor.id() {
            past_anchor = true;
            continue;
        }
        if !past_anchor {
            continue;
        }
        if let Some(el) = ElementRef::wrap(node) {
            if pred(el) {
                return Some(el);
            }
        }
    }
    None
}

/// Trimmed text of the first element matching `css`, or `None` when there
/// is no match or the match is empty.
fn first_text(doc: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).expect("valid selector");
    doc.select(&selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

/// Substring match over the raw class attribute. Used for the site's
/// utility-class soup (`"flex flex-col border-solid …"`), where token
/// matching would miss multi-class markers.
fn has_class(el: ElementRef<'_>, needle: &str) -> bool {
    el.value().attr("class").is_some_and(|c| c.contains(needle))
}
