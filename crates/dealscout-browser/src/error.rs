use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("webdriver session could not be created at {url}: {source}")]
    Session {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("timed out after {timeout_ms}ms waiting for \"{query}\"")]
    WaitTimeout { query: String, timeout_ms: u64 },

    #[error("element handle could not be serialized for script injection: {0}")]
    ElementHandle(#[from] serde_json::Error),

    #[error("page returned a non-numeric scroll extent: {value}")]
    ScrollExtent { value: String },
}

impl BrowserError {
    /// `true` when the error is an element-wait expiring, as opposed to the
    /// session or the protocol breaking. Wait timeouts are the expected
    /// outcome of probing for elements that may legitimately be absent.
    #[must_use]
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, BrowserError::WaitTimeout { .. })
    }
}
