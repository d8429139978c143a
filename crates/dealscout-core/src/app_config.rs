use std::net::SocketAddr;

/// Application configuration, resolved once at startup.
///
/// Timing values deliberately live here rather than as constants in the
/// scraping code: the listing page's animation and lazy-loading behavior
/// shifts between site releases, and retuning a deployment must not require
/// a rebuild.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,

    /// WebDriver endpoint (chromedriver) the browser sessions connect to.
    pub webdriver_url: String,
    /// Listing view the pipeline navigates to.
    pub listing_url: String,
    pub headless: bool,

    /// Upper clamp for the per-job successful-card limit.
    pub max_job_limit: u32,

    pub page_load_timeout_secs: u64,
    /// Bounded wait for the popup's dialog container to appear.
    pub popup_wait_timeout_ms: u64,
    /// Bounded wait per candidate trigger element inside a card.
    pub clickable_wait_timeout_ms: u64,
    /// Poll interval for all bounded waits.
    pub poll_interval_ms: u64,

    /// Scroll-attempt budget for driving the lazy-loaded list to the end.
    pub scroll_max_attempts: u32,
    /// Settle time after each scroll before re-reading the scroll extent.
    pub scroll_settle_delay_ms: u64,
    /// Extra pause before confirming an unchanged extent as end-of-content.
    pub scroll_confirm_delay_ms: u64,

    pub inter_card_delay_ms: u64,
    /// Passes of the dismiss routine per popup (and at startup).
    pub dismiss_max_attempts: u32,
    /// Startup passes over cookie/promo overlays before scrolling begins.
    pub startup_dismiss_passes: u32,
}
