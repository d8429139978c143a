//! Selector configuration for the listing page and its popups.
//!
//! Fallback chains are ordered strategy lists: candidates are tried in
//! sequence and the first usable result wins. The values here track the
//! retailer's design-system class names and test ids, which shift between
//! site releases; they are data, not code.

/// One strategy for reading a card's displayed name.
#[derive(Debug, Clone)]
pub enum NameSource {
    /// Visible text of the first element matching the query.
    Text(String),
    /// An attribute of the first element matching the query (e.g. an
    /// image's alt text).
    Attribute { query: String, name: String },
    /// First line of the card's own visible text.
    FirstTextLine,
}

/// Selector sets for one listing site.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    /// Resolves every deal card in the listing, in display order.
    pub card: String,
    /// Name sources tried in order within a card.
    pub name_sources: Vec<NameSource>,
    /// Popup triggers tried in order within a card.
    pub triggers: Vec<String>,
    /// The opened popup's dialog container.
    pub dialog: String,
    /// Close affordances, tried in order across the page.
    pub dismiss: Vec<String>,
}

impl ListingSelectors {
    /// Selector set for the Kroger weekly-ad listing.
    #[must_use]
    pub fn kroger() -> Self {
        Self {
            card: "div.kds-Card.SWA-Omni".to_owned(),
            name_sources: vec![
                NameSource::Text("span.SWA-OmniDealDescription2Lines".to_owned()),
                NameSource::Text(".kds-Heading--m".to_owned()),
                NameSource::Text("h2".to_owned()),
                NameSource::Attribute {
                    query: "img".to_owned(),
                    name: "alt".to_owned(),
                },
                NameSource::FirstTextLine,
            ],
            triggers: vec![
                "button[data-testid='SWA-Omni-ImageContainer']".to_owned(),
                "button[role='button'] img".to_owned(),
            ],
            dialog: "div[role='dialog']".to_owned(),
            dismiss: vec![
                "button[data-testid='CloseButton']".to_owned(),
                "button[data-testid='ModalCloseButton']".to_owned(),
                "button[aria-label='Close']".to_owned(),
                "div[role='dialog'] button".to_owned(),
            ],
        }
    }
}
