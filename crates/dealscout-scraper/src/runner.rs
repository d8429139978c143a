//! Pipeline body: everything that happens on one acquired page.

use dealscout_browser::Page;
use dealscout_core::{AppConfig, OfferContext};

use crate::card::{dismiss_popups, harvest_cards, HarvestOutcome};
use crate::error::ScrapeError;
use crate::loader::load_full_listing;
use crate::selectors::ListingSelectors;
use crate::tuning::ScrapeTuning;

/// Everything one pipeline run needs besides the page itself.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub listing_url: String,
    pub tuning: ScrapeTuning,
    pub selectors: ListingSelectors,
    pub offer: OfferContext,
    /// Upper clamp applied to submitted limits.
    pub max_limit: u32,
}

impl RunSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            listing_url: config.listing_url.clone(),
            tuning: ScrapeTuning::from_config(config),
            selectors: ListingSelectors::kroger(),
            offer: OfferContext::kroger(),
            max_limit: config.max_job_limit,
        }
    }
}

/// Runs the whole scrape on an already-acquired page: navigate, clear
/// startup overlays, materialize the listing, walk the cards.
///
/// # Errors
///
/// Returns [`ScrapeError`] when the listing cannot be reached or the page
/// breaks outside per-card recovery; per-card failures are absorbed into
/// the returned [`HarvestOutcome`] counters.
pub async fn run_pipeline(
    page: &dyn Page,
    settings: &RunSettings,
    limit: u32,
) -> Result<HarvestOutcome, ScrapeError> {
    let tuning = &settings.tuning;

    tracing::info!(url = %settings.listing_url, "navigating to listing");
    page.navigate(&settings.listing_url).await?;

    // The SPA renders everything after the document loads; an absent body
    // after the timeout means the listing never came up at all.
    page.wait_for("body", tuning.page_load_timeout, tuning.poll_interval)
        .await
        .map_err(|e| {
            if e.is_wait_timeout() {
                ScrapeError::ListingUnavailable {
                    timeout_ms: u64::try_from(tuning.page_load_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                }
            } else {
                ScrapeError::Browser(e)
            }
        })?;

    // Cookie notices and promo modals stack up on first load; several
    // passes because dismissing one can reveal the next.
    for _ in 0..tuning.startup_dismiss_passes {
        dismiss_popups(page, &settings.selectors, tuning).await;
        tokio::time::sleep(tuning.poll_interval).await;
    }

    let scroll = load_full_listing(page, tuning).await?;
    tracing::info!(
        attempts = scroll.attempts,
        extent = scroll.final_extent,
        exhausted = scroll.budget_exhausted,
        "listing materialization finished"
    );

    let outcome = harvest_cards(
        page,
        &settings.selectors,
        tuning,
        &settings.offer,
        limit,
    )
    .await?;

    tracing::info!(
        total = outcome.total_cards,
        ok = outcome.successes,
        failed = outcome.failures,
        records = outcome.records.len(),
        "card walk finished"
    );

    Ok(outcome)
}
