use thiserror::Error;

use crate::app_config::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed. Every variable has a
/// default, so a missing variable is never an error.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got \"{other}\""),
            }),
        }
    };

    Ok(AppConfig {
        bind_addr: parse_addr("DEALSCOUT_BIND_ADDR", "0.0.0.0:8080")?,
        log_level: or_default("DEALSCOUT_LOG_LEVEL", "info"),

        webdriver_url: or_default("DEALSCOUT_WEBDRIVER_URL", "http://localhost:9515"),
        listing_url: or_default(
            "DEALSCOUT_LISTING_URL",
            "https://www.kroger.com/weeklyad/weeklyad",
        ),
        headless: parse_bool("DEALSCOUT_HEADLESS", "true")?,

        max_job_limit: parse_u32("DEALSCOUT_MAX_JOB_LIMIT", "1000")?,

        page_load_timeout_secs: parse_u64("DEALSCOUT_PAGE_LOAD_TIMEOUT_SECS", "30")?,
        popup_wait_timeout_ms: parse_u64("DEALSCOUT_POPUP_WAIT_TIMEOUT_MS", "8000")?,
        clickable_wait_timeout_ms: parse_u64("DEALSCOUT_CLICKABLE_WAIT_TIMEOUT_MS", "5000")?,
        poll_interval_ms: parse_u64("DEALSCOUT_POLL_INTERVAL_MS", "250")?,

        scroll_max_attempts: parse_u32("DEALSCOUT_SCROLL_MAX_ATTEMPTS", "40")?,
        scroll_settle_delay_ms: parse_u64("DEALSCOUT_SCROLL_SETTLE_DELAY_MS", "700")?,
        scroll_confirm_delay_ms: parse_u64("DEALSCOUT_SCROLL_CONFIRM_DELAY_MS", "1000")?,

        inter_card_delay_ms: parse_u64("DEALSCOUT_INTER_CARD_DELAY_MS", "500")?,
        dismiss_max_attempts: parse_u32("DEALSCOUT_DISMISS_MAX_ATTEMPTS", "3")?,
        startup_dismiss_passes: parse_u32("DEALSCOUT_STARTUP_DISMISS_PASSES", "3")?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_yields_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.webdriver_url, "http://localhost:9515");
        assert!(cfg.listing_url.contains("weeklyad"));
        assert!(cfg.headless);
        assert_eq!(cfg.max_job_limit, 1000);
        assert_eq!(cfg.scroll_max_attempts, 40);
        assert_eq!(cfg.popup_wait_timeout_ms, 8000);
        assert_eq!(cfg.clickable_wait_timeout_ms, 5000);
        assert_eq!(cfg.poll_interval_ms, 250);
        assert_eq!(cfg.inter_card_delay_ms, 500);
        assert_eq!(cfg.dismiss_max_attempts, 3);
        assert_eq!(cfg.startup_dismiss_passes, 3);
    }

    #[test]
    fn overrides_are_applied() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_WEBDRIVER_URL", "http://driver:4444");
        map.insert("DEALSCOUT_SCROLL_MAX_ATTEMPTS", "20");
        map.insert("DEALSCOUT_HEADLESS", "false");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.webdriver_url, "http://driver:4444");
        assert_eq!(cfg.scroll_max_attempts, 20);
        assert!(!cfg.headless);
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALSCOUT_BIND_ADDR"),
            "expected InvalidEnvVar(DEALSCOUT_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn invalid_scroll_budget_is_rejected() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_SCROLL_MAX_ATTEMPTS", "lots");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALSCOUT_SCROLL_MAX_ATTEMPTS"),
            "expected InvalidEnvVar(DEALSCOUT_SCROLL_MAX_ATTEMPTS), got: {result:?}"
        );
    }

    #[test]
    fn invalid_headless_flag_is_rejected() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_HEADLESS", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEALSCOUT_HEADLESS"),
            "expected InvalidEnvVar(DEALSCOUT_HEADLESS), got: {result:?}"
        );
    }

    #[test]
    fn numeric_bool_forms_are_accepted() {
        let mut map = HashMap::new();
        map.insert("DEALSCOUT_HEADLESS", "0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.headless);
    }
}
