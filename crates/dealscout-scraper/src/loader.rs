//! Content-loaded detector.
//!
//! The listing is virtualized: cards materialize as the viewport
//! approaches them. The detector drives the page to the bottom in steps,
//! watching the total scrollable extent, and stops once the extent holds
//! still across two consecutive readings. A single unchanged reading is
//! not trusted, because the page may still be fetching the next batch
//! when the first reading is taken.

use dealscout_browser::{BrowserError, Page};

use crate::tuning::ScrapeTuning;

/// What the detector observed while materializing the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Scroll attempts consumed.
    pub attempts: u32,
    /// Scrollable extent when the detector stopped, in pixels.
    pub final_extent: i64,
    /// The attempt budget ran out before the extent stabilized.
    pub budget_exhausted: bool,
}

/// Scrolls the listing until its scrollable extent stops growing, then
/// returns the viewport to the top so card lookups start from a known
/// position.
///
/// Budget exhaustion is not an error: the run proceeds with whatever
/// content loaded, under a warning.
///
/// # Errors
///
/// Returns [`BrowserError`] only for page-level failures (broken session,
/// script execution failure).
pub async fn load_full_listing(
    page: &dyn Page,
    tuning: &ScrapeTuning,
) -> Result<ScrollOutcome, BrowserError> {
    let mut last_extent = page.scroll_extent().await?;
    let mut attempts = 0u32;
    let mut stabilized = false;

    while attempts < tuning.scroll_max_attempts {
        // Jump by a full extent: lands at the bottom regardless of how
        // much the previous batch grew the page.
        page.scroll_by(last_extent).await?;
        tokio::time::sleep(tuning.scroll_settle_delay).await;
        attempts += 1;

        let new_extent = page.scroll_extent().await?;
        if new_extent == last_extent {
            tokio::time::sleep(tuning.scroll_confirm_delay).await;
            let confirmed = page.scroll_extent().await?;
            if confirmed == last_extent {
                stabilized = true;
                break;
            }
            last_extent = confirmed;
        } else {
            last_extent = new_extent;
        }
    }

    if stabilized {
        tracing::debug!(attempts, extent = last_extent, "listing fully materialized");
    } else {
        tracing::warn!(
            attempts,
            extent = last_extent,
            "scroll budget exhausted before the listing stabilized; continuing with loaded content"
        );
    }

    page.scroll_to_top().await?;

    Ok(ScrollOutcome {
        attempts,
        final_extent: last_extent,
        budget_exhausted: !stabilized,
    })
}
