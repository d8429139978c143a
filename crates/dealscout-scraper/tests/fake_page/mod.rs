//! Scripted in-memory implementation of the browser traits.
//!
//! Stands in for a real WebDriver session: cards, popup markup, and the
//! scroll-extent sequence are declared up front, and the pipeline is run
//! against them without any network or browser process.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use dealscout_browser::{BrowserError, Page, PageElement, PageProvider};

const CARD_QUERY: &str = "div.kds-Card.SWA-Omni";
const LABEL_QUERY: &str = "span.SWA-OmniDealDescription2Lines";
const IMG_QUERY: &str = "img";
const TRIGGER_QUERY: &str = "button[data-testid='SWA-Omni-ImageContainer']";
const DIALOG_QUERY: &str = "div[role='dialog']";
const CLOSE_QUERY: &str = "button[aria-label='Close']";

/// One scripted deal card.
#[derive(Clone, Default)]
pub struct FakeCardSpec {
    /// Text served for the structured description label, when present.
    pub label: Option<&'static str>,
    /// Alt text served for the card image, when present.
    pub img_alt: Option<&'static str>,
    /// The card's raw visible text (the last-resort name source).
    pub raw_text: &'static str,
    /// Whether the image-container trigger exists and is clickable.
    pub has_trigger: bool,
    /// Markup served as the dialog once the trigger is clicked.
    pub popup_html: &'static str,
}

pub struct FakeState {
    pub cards: Vec<FakeCardSpec>,
    /// Successive `scroll_extent` readings; the last value repeats.
    pub extents: Vec<i64>,
    /// When set, the extent grows on every read and never stabilizes.
    pub always_growing: bool,
    pub fail_navigate: bool,

    extent_reads: AtomicUsize,
    open_popup: Mutex<Option<String>>,
    pub scrolled_to_top: AtomicBool,
    pub closed: AtomicBool,
}

impl FakeState {
    pub fn new(cards: Vec<FakeCardSpec>, extents: Vec<i64>) -> Arc<Self> {
        Arc::new(Self {
            cards,
            extents,
            always_growing: false,
            fail_navigate: false,
            extent_reads: AtomicUsize::new(0),
            open_popup: Mutex::new(None),
            scrolled_to_top: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    /// A page whose scrollable extent grows on every read and never
    /// stabilizes.
    pub fn growing() -> Arc<Self> {
        Arc::new(Self {
            cards: Vec::new(),
            extents: Vec::new(),
            always_growing: true,
            fail_navigate: false,
            extent_reads: AtomicUsize::new(0),
            open_popup: Mutex::new(None),
            scrolled_to_top: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    /// A page whose navigation fails outright.
    pub fn failing_navigation() -> Arc<Self> {
        Arc::new(Self {
            cards: Vec::new(),
            extents: vec![500],
            always_growing: false,
            fail_navigate: true,
            extent_reads: AtomicUsize::new(0),
            open_popup: Mutex::new(None),
            scrolled_to_top: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    fn next_extent(&self) -> i64 {
        let n = self.extent_reads.fetch_add(1, Ordering::SeqCst);
        if self.always_growing {
            return i64::try_from(n + 1).unwrap() * 100;
        }
        let idx = n.min(self.extents.len().saturating_sub(1));
        self.extents.get(idx).copied().unwrap_or(0)
    }
}

pub struct FakePage {
    pub state: Arc<FakeState>,
}

enum Role {
    Body,
    Card(usize),
    Text(String),
    AltImage(String),
    Trigger(usize),
    Dialog(String),
    CloseButton,
}

struct FakeElement {
    state: Arc<FakeState>,
    role: Role,
}

impl FakeElement {
    fn boxed(state: &Arc<FakeState>, role: Role) -> Box<dyn PageElement> {
        Box::new(FakeElement {
            state: Arc::clone(state),
            role,
        })
    }
}

// The production error type wraps fantoccini's CmdError; NotJson is the
// one variant constructible without a live session.
fn command_error(message: &str) -> BrowserError {
    BrowserError::Command(fantoccini::error::CmdError::NotJson(message.to_owned()))
}

#[async_trait]
impl PageElement for FakeElement {
    async fn text(&self) -> Result<String, BrowserError> {
        Ok(match &self.role {
            Role::Card(idx) => self.state.cards[*idx].raw_text.to_owned(),
            Role::Text(text) => text.clone(),
            _ => String::new(),
        })
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(match &self.role {
            Role::AltImage(alt) if name == "alt" => Some(alt.clone()),
            _ => None,
        })
    }

    async fn outer_html(&self) -> Result<String, BrowserError> {
        Ok(match &self.role {
            Role::Dialog(html) => html.clone(),
            _ => String::new(),
        })
    }

    async fn click(&self) -> Result<(), BrowserError> {
        match &self.role {
            Role::Trigger(idx) => {
                let html = self.state.cards[*idx].popup_html.to_owned();
                *self.state.open_popup.lock().unwrap() = Some(html);
                Ok(())
            }
            Role::CloseButton => {
                *self.state.open_popup.lock().unwrap() = None;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn is_displayed(&self) -> Result<bool, BrowserError> {
        Ok(true)
    }

    async fn is_enabled(&self) -> Result<bool, BrowserError> {
        Ok(true)
    }

    async fn find(&self, css: &str) -> Result<Option<Box<dyn PageElement>>, BrowserError> {
        let Role::Card(idx) = &self.role else {
            return Ok(None);
        };
        let idx = *idx;
        let spec = &self.state.cards[idx];

        let found = match css {
            LABEL_QUERY => spec
                .label
                .map(|text| FakeElement::boxed(&self.state, Role::Text(text.to_owned()))),
            IMG_QUERY => spec
                .img_alt
                .map(|alt| FakeElement::boxed(&self.state, Role::AltImage(alt.to_owned()))),
            TRIGGER_QUERY if spec.has_trigger => {
                Some(FakeElement::boxed(&self.state, Role::Trigger(idx)))
            }
            _ => None,
        };
        Ok(found)
    }

    async fn find_all(&self, _css: &str) -> Result<Vec<Box<dyn PageElement>>, BrowserError> {
        Ok(Vec::new())
    }

    async fn scroll_into_view(&self) -> Result<(), BrowserError> {
        Ok(())
    }
}

#[async_trait]
impl Page for FakePage {
    async fn navigate(&self, _url: &str) -> Result<(), BrowserError> {
        if self.state.fail_navigate {
            return Err(command_error("connection refused"));
        }
        Ok(())
    }

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn PageElement>>, BrowserError> {
        match css {
            CARD_QUERY => Ok((0..self.state.cards.len())
                .map(|idx| FakeElement::boxed(&self.state, Role::Card(idx)))
                .collect()),
            CLOSE_QUERY => {
                let open = self.state.open_popup.lock().unwrap().is_some();
                Ok(if open {
                    vec![FakeElement::boxed(&self.state, Role::CloseButton)]
                } else {
                    Vec::new()
                })
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn wait_for(
        &self,
        css: &str,
        timeout: Duration,
        _poll: Duration,
    ) -> Result<Box<dyn PageElement>, BrowserError> {
        if css == "body" {
            return Ok(FakeElement::boxed(&self.state, Role::Body));
        }
        if css == DIALOG_QUERY {
            if let Some(html) = self.state.open_popup.lock().unwrap().clone() {
                return Ok(FakeElement::boxed(&self.state, Role::Dialog(html)));
            }
        }
        Err(BrowserError::WaitTimeout {
            query: css.to_owned(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }

    async fn scroll_by(&self, _delta_y: i64) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn scroll_to_top(&self) -> Result<(), BrowserError> {
        self.state.scrolled_to_top.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn scroll_extent(&self) -> Result<i64, BrowserError> {
        Ok(self.state.next_extent())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.state.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out [`FakePage`]s over shared scripted state. When `gate` is set,
/// `acquire` parks until the test releases a permit, holding the job in
/// its running state deterministically.
pub struct FakeProvider {
    pub state: Arc<FakeState>,
    pub gate: Option<Arc<tokio::sync::Semaphore>>,
}

impl FakeProvider {
    pub fn new(state: Arc<FakeState>) -> Self {
        Self { state, gate: None }
    }

    pub fn gated(state: Arc<FakeState>, gate: Arc<tokio::sync::Semaphore>) -> Self {
        Self {
            state,
            gate: Some(gate),
        }
    }
}

#[async_trait]
impl PageProvider for FakeProvider {
    async fn acquire(&self) -> Result<Box<dyn Page>, BrowserError> {
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }
        Ok(Box::new(FakePage {
            state: Arc::clone(&self.state),
        }))
    }
}
