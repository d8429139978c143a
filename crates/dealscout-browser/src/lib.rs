//! The browser capability consumed by the scraping pipeline.
//!
//! The pipeline never talks to WebDriver directly: it works against the
//! [`Page`] / [`PageElement`] traits, which expose exactly the operations
//! the pipeline needs (navigate, query, bounded waits, scrolling, markup
//! capture). [`webdriver`] provides the production implementation over a
//! fantoccini session; tests substitute a scripted implementation.

pub mod error;
pub mod page;
pub mod session;
pub mod webdriver;

pub use error::BrowserError;
pub use page::{Page, PageElement, PageProvider};
pub use session::WebDriverProvider;
