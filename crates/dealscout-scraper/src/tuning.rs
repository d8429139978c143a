//! Timing configuration for one scraping run.
//!
//! All delays and timeouts the pipeline uses live here, sourced from
//! [`AppConfig`] at startup. Tests construct a [`ScrapeTuning`] with
//! near-zero values directly.

use std::time::Duration;

use dealscout_core::AppConfig;

#[derive(Debug, Clone)]
pub struct ScrapeTuning {
    /// Bound on waiting for the listing document to render after navigation.
    pub page_load_timeout: Duration,
    /// Bound on waiting for a popup's dialog container.
    pub popup_wait_timeout: Duration,
    /// Bound on waiting for one candidate trigger to become clickable.
    pub clickable_wait_timeout: Duration,
    /// Poll interval shared by all bounded waits.
    pub poll_interval: Duration,

    /// Scroll-attempt budget for materializing the lazy-loaded listing.
    pub scroll_max_attempts: u32,
    /// Settle time after each scroll before re-reading the extent.
    pub scroll_settle_delay: Duration,
    /// Pause before confirming an unchanged extent as end-of-content.
    pub scroll_confirm_delay: Duration,

    /// Settle time between consecutive cards.
    pub inter_card_delay: Duration,
    /// Passes of the dismiss routine per invocation.
    pub dismiss_max_attempts: u32,
    /// Dismiss passes over cookie/promo overlays right after navigation.
    pub startup_dismiss_passes: u32,
}

impl ScrapeTuning {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
            popup_wait_timeout: Duration::from_millis(config.popup_wait_timeout_ms),
            clickable_wait_timeout: Duration::from_millis(config.clickable_wait_timeout_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            scroll_max_attempts: config.scroll_max_attempts,
            scroll_settle_delay: Duration::from_millis(config.scroll_settle_delay_ms),
            scroll_confirm_delay: Duration::from_millis(config.scroll_confirm_delay_ms),
            inter_card_delay: Duration::from_millis(config.inter_card_delay_ms),
            dismiss_max_attempts: config.dismiss_max_attempts,
            startup_dismiss_passes: config.startup_dismiss_passes,
        }
    }
}

impl Default for ScrapeTuning {
    fn default() -> Self {
        Self {
            page_load_timeout: Duration::from_secs(30),
            popup_wait_timeout: Duration::from_millis(8000),
            clickable_wait_timeout: Duration::from_millis(5000),
            poll_interval: Duration::from_millis(250),
            scroll_max_attempts: 40,
            scroll_settle_delay: Duration::from_millis(700),
            scroll_confirm_delay: Duration::from_millis(1000),
            inter_card_delay: Duration::from_millis(500),
            dismiss_max_attempts: 3,
            startup_dismiss_passes: 3,
        }
    }
}
