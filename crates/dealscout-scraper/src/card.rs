//! Card interaction state machine.
//!
//! Each card moves through `Located → NameExtracted → PopupOpened →
//! Extracted → Dismissed`, with `Skipped` absorbing failures from the
//! early states. The card handle is re-resolved by index on every pass:
//! the listing re-renders during scrolling and popup interaction, so DOM
//! handles are not stable across cards.
//!
//! Failure here is routine, not exceptional. Every per-card error is
//! caught at [`harvest_cards`]'s boundary, counted, followed by a
//! defensive dismiss pass, and the walk moves on; one broken card never
//! aborts a run.

use dealscout_browser::{Page, PageElement};
use dealscout_core::{DealRecord, OfferContext};

use crate::error::CardFailure;
use crate::extract::parse_popup;
use crate::selectors::{ListingSelectors, NameSource};
use crate::tuning::ScrapeTuning;
use crate::wait::poll_until;

/// Totals for one pass over the listing.
#[derive(Debug, Default)]
pub struct HarvestOutcome {
    /// Cards discovered in the fully materialized listing.
    pub total_cards: u32,
    pub successes: u32,
    pub failures: u32,
    /// All extracted records, in card order.
    pub records: Vec<DealRecord>,
}

/// Walks the listing in order, processing cards until `limit` cards have
/// been **successfully** extracted or the listing is exhausted.
///
/// Skipped cards consume iteration budget but do not count toward the
/// limit.
///
/// # Errors
///
/// Returns [`dealscout_browser::BrowserError`] only if the initial card
/// discovery fails; everything after that is recovered per card.
pub async fn harvest_cards(
    page: &dyn Page,
    selectors: &ListingSelectors,
    tuning: &ScrapeTuning,
    offer: &OfferContext,
    limit: u32,
) -> Result<HarvestOutcome, dealscout_browser::BrowserError> {
    let total = page.find_all(&selectors.card).await?.len();
    tracing::info!(total, limit, "discovered deal cards");

    let mut outcome = HarvestOutcome {
        total_cards: u32::try_from(total).unwrap_or(u32::MAX),
        ..HarvestOutcome::default()
    };

    for index in 0..total {
        if outcome.successes >= limit {
            break;
        }

        match process_card(page, selectors, tuning, offer, index).await {
            Ok(mut records) => {
                tracing::debug!(index, records = records.len(), "card extracted");
                outcome.successes += 1;
                outcome.records.append(&mut records);
            }
            Err(failure) => {
                tracing::warn!(index, error = %failure, "card skipped");
                outcome.failures += 1;
            }
        }

        // The popup (or its failure residue) must be gone before the next
        // card is touched.
        dismiss_popups(page, selectors, tuning).await;
        tokio::time::sleep(tuning.inter_card_delay).await;
    }

    Ok(outcome)
}

/// Drives one card through the full state sequence.
async fn process_card(
    page: &dyn Page,
    selectors: &ListingSelectors,
    tuning: &ScrapeTuning,
    offer: &OfferContext,
    index: usize,
) -> Result<Vec<DealRecord>, CardFailure> {
    // Located
    let card = locate_card(page, selectors, index).await?;
    card.scroll_into_view()
        .await
        .map_err(|source| CardFailure::Browser { index, source })?;

    // NameExtracted
    let name = extract_name(card.as_ref(), selectors, index).await?;

    // PopupOpened
    open_popup(card.as_ref(), selectors, tuning, index).await?;

    // Extracted
    let html = capture_popup(page, selectors, tuning, index).await?;
    let records = parse_popup(&html, &name, offer);
    if records.is_empty() {
        return Err(CardFailure::EmptyExtraction { index });
    }
    Ok(records)
}

/// Re-resolves the card at `index` in the current listing.
async fn locate_card(
    page: &dyn Page,
    selectors: &ListingSelectors,
    index: usize,
) -> Result<Box<dyn PageElement>, CardFailure> {
    let mut cards = page
        .find_all(&selectors.card)
        .await
        .map_err(|source| CardFailure::Browser { index, source })?;
    if index >= cards.len() {
        // The list re-rendered shorter; this card is gone for good.
        return Err(CardFailure::Vanished { index });
    }
    Ok(cards.swap_remove(index))
}

/// Applies the ordered name-source chain; first non-empty result wins.
///
/// A name carrying the `Unknown` sentinel marks a decorative or otherwise
/// un-openable card and skips it before any popup interaction.
async fn extract_name(
    card: &dyn PageElement,
    selectors: &ListingSelectors,
    index: usize,
) -> Result<String, CardFailure> {
    for source in &selectors.name_sources {
        let candidate = match source {
            NameSource::Text(query) => match card.find(query).await {
                Ok(Some(el)) => el.text().await.ok(),
                _ => None,
            },
            NameSource::Attribute { query, name } => match card.find(query).await {
                Ok(Some(el)) => el.attribute(name).await.ok().flatten(),
                _ => None,
            },
            NameSource::FirstTextLine => card
                .text()
                .await
                .ok()
                .and_then(|text| text.lines().next().map(str::to_owned)),
        };

        if let Some(name) = candidate {
            let name = name.trim().to_owned();
            if name.is_empty() {
                continue;
            }
            if name.contains("Unknown") {
                return Err(CardFailure::NameUnavailable { index });
            }
            return Ok(name);
        }
    }
    Err(CardFailure::NameUnavailable { index })
}

/// Tries each candidate trigger with a bounded wait-for-clickable; the
/// first successful click opens the popup.
async fn open_popup(
    card: &dyn PageElement,
    selectors: &ListingSelectors,
    tuning: &ScrapeTuning,
    index: usize,
) -> Result<(), CardFailure> {
    for trigger in &selectors.triggers {
        let found = poll_until(
            tuning.clickable_wait_timeout,
            tuning.poll_interval,
            move || async move {
                match card.find(trigger).await? {
                    Some(el) => {
                        if el.is_displayed().await? && el.is_enabled().await? {
                            Ok(Some(el))
                        } else {
                            Ok(None)
                        }
                    }
                    None => Ok(None),
                }
            },
        )
        .await;

        match found {
            Ok(Some(el)) => {
                if el.click().await.is_ok() {
                    return Ok(());
                }
                tracing::debug!(index, %trigger, "trigger click failed; trying next candidate");
            }
            Ok(None) => {
                tracing::debug!(index, %trigger, "trigger never became clickable");
            }
            Err(e) => {
                tracing::debug!(index, %trigger, error = %e, "trigger probe failed");
            }
        }
    }
    Err(CardFailure::TriggerExhausted { index })
}

/// Waits for the popup's dialog container and captures its markup.
async fn capture_popup(
    page: &dyn Page,
    selectors: &ListingSelectors,
    tuning: &ScrapeTuning,
    index: usize,
) -> Result<String, CardFailure> {
    let dialog = page
        .wait_for(
            &selectors.dialog,
            tuning.popup_wait_timeout,
            tuning.poll_interval,
        )
        .await
        .map_err(|e| {
            if e.is_wait_timeout() {
                CardFailure::PopupTimeout { index }
            } else {
                CardFailure::Browser { index, source: e }
            }
        })?;

    dialog
        .outer_html()
        .await
        .map_err(|source| CardFailure::Browser { index, source })
}

/// Clicks every visible close affordance, in selector order, for up to
/// `dismiss_max_attempts` passes.
///
/// Finding nothing to dismiss is the common case (many popups
/// self-dismiss) and ends the routine quietly. Individual click failures
/// are ignored; the affordance may have vanished between query and click.
pub async fn dismiss_popups(page: &dyn Page, selectors: &ListingSelectors, tuning: &ScrapeTuning) {
    for _ in 0..tuning.dismiss_max_attempts {
        let mut clicked_any = false;

        for query in &selectors.dismiss {
            let Ok(candidates) = page.find_all(query).await else {
                continue;
            };
            for el in candidates.iter().take(3) {
                if el.is_displayed().await.unwrap_or(false) && el.click().await.is_ok() {
                    clicked_any = true;
                }
            }
        }

        if !clicked_any {
            break;
        }
        tokio::time::sleep(tuning.poll_interval).await;
    }
}
