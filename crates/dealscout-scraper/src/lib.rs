//! Scraping pipeline for the weekly-ad deal listing.
//!
//! The pipeline consumes a controllable browser page
//! ([`dealscout_browser::Page`]) and produces normalized
//! [`dealscout_core::DealRecord`]s: the content-loaded detector drives the
//! lazy listing to full materialization, the card state machine opens each
//! deal popup, and the popup extractor parses either popup layout into
//! records. The orchestrator sequences one job at a time and exposes the
//! submit/status/results operations the HTTP layer serves.

pub mod card;
pub mod error;
pub mod extract;
pub mod loader;
pub mod orchestrator;
pub mod runner;
pub mod selectors;
pub mod store;
pub mod tuning;
pub mod wait;

pub use card::{harvest_cards, HarvestOutcome};
pub use error::{CardFailure, JobError, ScrapeError};
pub use extract::{classify_layout, parse_popup, PopupLayout};
pub use loader::{load_full_listing, ScrollOutcome};
pub use orchestrator::Orchestrator;
pub use runner::{run_pipeline, RunSettings};
pub use selectors::{ListingSelectors, NameSource};
pub use store::JobStore;
pub use tuning::ScrapeTuning;
