//! PomDriver - the browser automation seam
//!
//! pomkit never talks to a browser itself. Everything that touches the DOM
//! goes through [`PomDriver`], so a CDP client, a WebDriver bridge or the
//! in-crate [`MockDriver`] can sit behind the registries and the sequencer.
//!
//! ```text
//! ┌──────────────┐   Locator    ┌──────────────┐   selector    ┌────────────┐
//! │  Registry /  │─────────────►│   Locator    │──────────────►│ PomDriver  │
//! │  FeatureMap  │              │  (+ origin)  │  enter/exit   │  (browser) │
//! └──────────────┘              └──────────────┘   origin      └────────────┘
//! ```
//!
//! All methods take `&self`: step closures borrow the driver concurrently
//! with the test body, so implementations keep their mutable state behind a
//! lock.

use crate::result::{PomError, PomResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Element handle for DOM interactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Unique identifier for the element
    pub id: String,
    /// Element tag name
    pub tag_name: String,
    /// Element text content
    pub text_content: Option<String>,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text_content: None,
        }
    }

    /// Attach text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }
}

/// Abstract driver trait for browser automation
///
/// # Implementations
///
/// - `MockDriver` - For unit testing
/// - anything wrapping a real browser session (CDP, WebDriver)
#[async_trait]
pub trait PomDriver: Send + Sync {
    /// Navigate to URL
    async fn navigate(&self, url: &str) -> PomResult<()>;

    /// Query all elements matching a selector in the current context
    async fn query_selector_all(&self, selector: &str) -> PomResult<Vec<ElementHandle>>;

    /// Click the element matching a selector
    async fn click(&self, selector: &str) -> PomResult<()>;

    /// Type text into the element matching a selector
    async fn type_text(&self, selector: &str, text: &str) -> PomResult<()>;

    /// Switch execution into a cross-origin context
    async fn enter_origin(&self, origin: &str) -> PomResult<()>;

    /// Leave the context entered by the matching [`PomDriver::enter_origin`]
    async fn exit_origin(&self) -> PomResult<()>;

    /// Get current URL
    async fn current_url(&self) -> PomResult<String>;
}

#[derive(Debug, Default)]
struct MockState {
    current_url: String,
    origin_stack: Vec<String>,
    call_history: Vec<String>,
}

/// Mock driver for unit testing
///
/// Records every call as `"<method>:<args>"` and serves element lists from
/// a selector table configured up front.
#[derive(Debug, Default)]
pub struct MockDriver {
    elements: HashMap<String, Vec<ElementHandle>>,
    failing: HashSet<String>,
    failing_origins: HashSet<String>,
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `count` generic elements for a selector
    #[must_use]
    pub fn with_elements(mut self, selector: impl Into<String>, count: usize) -> Self {
        let selector = selector.into();
        let handles = (0..count)
            .map(|i| ElementHandle::new(format!("{selector}#{i}"), "div"))
            .collect();
        let _ = self.elements.insert(selector, handles);
        self
    }

    /// Serve explicit handles for a selector
    #[must_use]
    pub fn with_handles(mut self, selector: impl Into<String>, handles: Vec<ElementHandle>) -> Self {
        let _ = self.elements.insert(selector.into(), handles);
        self
    }

    /// Make every action on a selector fail
    #[must_use]
    pub fn with_failing_selector(mut self, selector: impl Into<String>) -> Self {
        let _ = self.failing.insert(selector.into());
        self
    }

    /// Make entering an origin fail
    #[must_use]
    pub fn with_failing_origin(mut self, origin: impl Into<String>) -> Self {
        let _ = self.failing_origins.insert(origin.into());
        self
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.lock().call_history.iter().any(|c| c.starts_with(method))
    }

    /// Origin the driver is currently switched into, if any
    #[must_use]
    pub fn active_origin(&self) -> Option<String> {
        self.lock().origin_stack.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, entry: String) {
        self.lock().call_history.push(entry);
    }

    fn check_selector(&self, selector: &str) -> PomResult<()> {
        if self.failing.contains(selector) {
            return Err(PomError::driver(format!("selector {selector} is not actionable")));
        }
        Ok(())
    }
}

#[async_trait]
impl PomDriver for MockDriver {
    async fn navigate(&self, url: &str) -> PomResult<()> {
        self.record(format!("navigate:{url}"));
        self.lock().current_url = url.to_string();
        Ok(())
    }

    async fn query_selector_all(&self, selector: &str) -> PomResult<Vec<ElementHandle>> {
        self.record(format!("query:{selector}"));
        self.check_selector(selector)?;
        Ok(self.elements.get(selector).cloned().unwrap_or_default())
    }

    async fn click(&self, selector: &str) -> PomResult<()> {
        self.record(format!("click:{selector}"));
        self.check_selector(selector)
    }

    async fn type_text(&self, selector: &str, text: &str) -> PomResult<()> {
        self.record(format!("type:{selector}:{text}"));
        self.check_selector(selector)
    }

    async fn enter_origin(&self, origin: &str) -> PomResult<()> {
        self.record(format!("enter_origin:{origin}"));
        if self.failing_origins.contains(origin) {
            return Err(PomError::driver(format!("cannot switch to origin {origin}")));
        }
        self.lock().origin_stack.push(origin.to_string());
        Ok(())
    }

    async fn exit_origin(&self) -> PomResult<()> {
        self.record("exit_origin".to_string());
        self.lock()
            .origin_stack
            .pop()
            .map(|_| ())
            .ok_or_else(|| PomError::driver("exit_origin called outside an origin"))
    }

    async fn current_url(&self) -> PomResult<String> {
        Ok(self.lock().current_url.clone())
    }
}
