//! Canonical deal model: the normalized record every extraction converges to.
//!
//! ## Observed popup shapes
//!
//! The weekly-ad page presents each deal in one of two popup layouts (a
//! coupon dialog and a standard deal dialog) with the same semantic
//! content. Both are flattened into [`DealRecord`]: one *anchor* record per
//! popup (the deal the card advertises) plus zero or more *qualifying item*
//! records (products that must be purchased to unlock the anchor deal).
//!
//! Prices are carried as display strings, not decimals: the site renders
//! values like `"$5.00"`, `"$1.99/lb"` and `"2 for $7"`, and downstream
//! consumers want them verbatim. Fields that cannot be read from the markup
//! hold the `"N/A"` sentinel rather than being omitted, so every record has
//! the full column set.

use serde::{Deserialize, Serialize};

/// Sentinel for a price that could not be read from the popup markup.
pub const PRICE_UNAVAILABLE: &str = "N/A";

/// Sentinel for a product size that could not be derived from either the
/// sizing label or the product name.
pub const SIZE_NOT_APPLICABLE: &str = "N/A";

/// One normalized promotional deal.
///
/// Records are created by the popup extractor from a single popup's markup
/// snapshot and are immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    /// Displayed product name (anchor: the card's name; qualifying item:
    /// the item container's description label).
    pub competitor_product: String,
    /// Promotional price as displayed, or [`PRICE_UNAVAILABLE`].
    pub competitor_price: String,
    /// Pre-discount price as displayed, or [`PRICE_UNAVAILABLE`] / empty
    /// when the popup shows no struck-through price.
    pub original_price: String,
    pub offer_description: String,
    /// Offer program identifier (e.g., a digital-coupon program).
    pub offer_source: String,
    pub source_url: String,
    /// Package size, or [`SIZE_NOT_APPLICABLE`].
    pub product_size: String,
    pub offer_event: String,
    /// Constant for a given site.
    pub competitor_name: String,
    /// `false` for the anchor deal, `true` for items required to unlock it.
    /// Exactly one record per popup is the anchor.
    pub is_qualifying_item: bool,
}

/// The constants shared by every [`DealRecord`] of one run.
#[derive(Debug, Clone)]
pub struct OfferContext {
    pub offer_description: String,
    pub offer_source: String,
    pub source_url: String,
    pub offer_event: String,
    pub competitor_name: String,
}

impl OfferContext {
    /// Offer context for the Kroger weekly digital-deals listing.
    #[must_use]
    pub fn kroger() -> Self {
        Self {
            offer_description: "Weekly Digital Deal".to_owned(),
            offer_source: "Digital coupon offer".to_owned(),
            source_url: "https://www.kroger.com/pr/weekly-digital-deals".to_owned(),
            offer_event: "Weekly Digital Deals".to_owned(),
            competitor_name: "Kroger".to_owned(),
        }
    }
}
