//! Fantoccini-backed implementation of the [`Page`] traits.
//!
//! Scrolling and scroll-extent reads go through injected script: the
//! WebDriver protocol has no first-class viewport scrolling, and the
//! listing page only materializes content in response to real scroll
//! events on `window`.

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};

use crate::error::BrowserError;
use crate::page::{Page, PageElement};

pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

struct WebDriverElement {
    client: Client,
    element: Element,
}

impl WebDriverElement {
    fn boxed(client: &Client, element: Element) -> Box<dyn PageElement> {
        Box::new(WebDriverElement {
            client: client.clone(),
            element,
        })
    }
}

#[async_trait]
impl PageElement for WebDriverElement {
    async fn text(&self) -> Result<String, BrowserError> {
        Ok(self.element.text().await?)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.element.attr(name).await?)
    }

    async fn outer_html(&self) -> Result<String, BrowserError> {
        Ok(self.element.html(false).await?)
    }

    async fn click(&self) -> Result<(), BrowserError> {
        // fantoccini's click consumes the element handle (a click may
        // navigate); the caller re-queries afterwards anyway.
        self.element.clone().click().await?;
        Ok(())
    }

    async fn is_displayed(&self) -> Result<bool, BrowserError> {
        Ok(self.element.is_displayed().await?)
    }

    async fn is_enabled(&self) -> Result<bool, BrowserError> {
        Ok(self.element.is_enabled().await?)
    }

    async fn find(&self, css: &str) -> Result<Option<Box<dyn PageElement>>, BrowserError> {
        match self.element.find(Locator::Css(css)).await {
            Ok(found) => Ok(Some(Self::boxed(&self.client, found))),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn PageElement>>, BrowserError> {
        let found = self.element.find_all(Locator::Css(css)).await?;
        Ok(found
            .into_iter()
            .map(|e| Self::boxed(&self.client, e))
            .collect())
    }

    async fn scroll_into_view(&self) -> Result<(), BrowserError> {
        let handle = serde_json::to_value(&self.element)?;
        self.client
            .execute(
                "arguments[0].scrollIntoView({block: 'center'});",
                vec![handle],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Page for WebDriverPage {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn PageElement>>, BrowserError> {
        let found = self.client.find_all(Locator::Css(css)).await?;
        Ok(found
            .into_iter()
            .map(|e| WebDriverElement::boxed(&self.client, e))
            .collect())
    }

    async fn wait_for(
        &self,
        css: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<Box<dyn PageElement>, BrowserError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .every(poll)
            .for_element(Locator::Css(css))
            .await
        {
            Ok(element) => Ok(WebDriverElement::boxed(&self.client, element)),
            Err(CmdError::WaitTimeout) => Err(BrowserError::WaitTimeout {
                query: css.to_owned(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn scroll_by(&self, delta_y: i64) -> Result<(), BrowserError> {
        self.client
            .execute(
                "window.scrollBy(0, arguments[0]);",
                vec![serde_json::Value::from(delta_y)],
            )
            .await?;
        Ok(())
    }

    async fn scroll_to_top(&self) -> Result<(), BrowserError> {
        self.client.execute("window.scrollTo(0, 0);", vec![]).await?;
        Ok(())
    }

    async fn scroll_extent(&self) -> Result<i64, BrowserError> {
        let value = self
            .client
            .execute("return document.body.scrollHeight;", vec![])
            .await?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .ok_or_else(|| BrowserError::ScrollExtent {
                value: value.to_string(),
            })
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.client.clone().close().await?;
        Ok(())
    }
}
