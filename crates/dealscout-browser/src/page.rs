//! Object-safe traits describing a controllable browser page.
//!
//! Element handles are transient: the listing re-renders during scrolling
//! and popup interaction, so callers re-query rather than holding a handle
//! across interactions. A handle that has gone stale surfaces as a
//! [`BrowserError::Command`] on its next use, which the pipeline treats as
//! a per-card soft failure.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;

/// One element resolved from a page query.
#[async_trait]
pub trait PageElement: Send + Sync {
    /// Visible text content.
    async fn text(&self) -> Result<String, BrowserError>;

    /// Attribute value, or `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError>;

    /// The element's outer markup.
    async fn outer_html(&self) -> Result<String, BrowserError>;

    async fn click(&self) -> Result<(), BrowserError>;

    async fn is_displayed(&self) -> Result<bool, BrowserError>;

    async fn is_enabled(&self) -> Result<bool, BrowserError>;

    /// First descendant matching `css`, or `None`.
    async fn find(&self, css: &str) -> Result<Option<Box<dyn PageElement>>, BrowserError>;

    /// All descendants matching `css`, in document order.
    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn PageElement>>, BrowserError>;

    /// Scroll the element into the center of the viewport.
    async fn scroll_into_view(&self) -> Result<(), BrowserError>;
}

/// A controllable browser page.
#[async_trait]
pub trait Page: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// All elements matching `css`, in document order. An empty result is
    /// not an error.
    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn PageElement>>, BrowserError>;

    /// Bounded wait for an element matching `css` to be present.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::WaitTimeout`] when the element does not
    /// appear within `timeout`; the page is polled every `poll`.
    async fn wait_for(
        &self,
        css: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<Box<dyn PageElement>, BrowserError>;

    /// Scroll the viewport down by `delta_y` pixels (negative scrolls up).
    async fn scroll_by(&self, delta_y: i64) -> Result<(), BrowserError>;

    async fn scroll_to_top(&self) -> Result<(), BrowserError>;

    /// The page's total scrollable height in pixels.
    async fn scroll_extent(&self) -> Result<i64, BrowserError>;

    /// Release the underlying browser session. Safe to call once on any
    /// exit path; the page is unusable afterwards.
    async fn close(&self) -> Result<(), BrowserError>;
}

/// The "obtain a controllable browser page" capability.
///
/// The orchestrator acquires exactly one page per job and closes it on
/// every exit path.
#[async_trait]
pub trait PageProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn Page>, BrowserError>;
}
