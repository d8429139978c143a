pub mod app_config;
pub mod config;
pub mod deal;
pub mod job;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use deal::{DealRecord, OfferContext, PRICE_UNAVAILABLE, SIZE_NOT_APPLICABLE};
pub use job::{Job, JobStatus};
