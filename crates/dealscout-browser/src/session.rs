//! WebDriver session bootstrap.
//!
//! Builds a Chrome session whose launch arguments mask the usual
//! automation fingerprints: the `AutomationControlled` blink feature is
//! disabled, the `enable-automation` infobar switch is excluded, the
//! window size is fixed to a common desktop resolution, and the user
//! agent is drawn from a small pool of current desktop Chrome strings.

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;

use fantoccini::ClientBuilder;

use crate::error::BrowserError;
use crate::page::{Page, PageProvider};
use crate::webdriver::WebDriverPage;

/// Desktop Chrome user agents the session picks from at random.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

/// Acquires fresh Chrome pages from a chromedriver endpoint.
pub struct WebDriverProvider {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverProvider {
    #[must_use]
    pub fn new(webdriver_url: impl Into<String>, headless: bool) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless,
        }
    }

    fn capabilities(&self) -> fantoccini::wd::Capabilities {
        let ua = USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())];

        let mut args = vec![
            "--no-sandbox".to_owned(),
            "--disable-dev-shm-usage".to_owned(),
            "--disable-blink-features=AutomationControlled".to_owned(),
            "--disable-gpu".to_owned(),
            "--disable-notifications".to_owned(),
            "--window-size=1920,1080".to_owned(),
            format!("--user-agent={ua}"),
        ];
        if self.headless {
            args.push("--headless=new".to_owned());
        }

        let mut caps = fantoccini::wd::Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_owned(),
            json!({
                "args": args,
                "excludeSwitches": ["enable-automation"],
            }),
        );
        caps
    }
}

#[async_trait]
impl PageProvider for WebDriverProvider {
    async fn acquire(&self) -> Result<Box<dyn Page>, BrowserError> {
        let caps = self.capabilities();
        tracing::debug!(url = %self.webdriver_url, headless = self.headless, "creating webdriver session");

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&self.webdriver_url)
            .await
            .map_err(|source| BrowserError::Session {
                url: self.webdriver_url.clone(),
                source,
            })?;

        Ok(Box::new(WebDriverPage::new(client)))
    }
}
