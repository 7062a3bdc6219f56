//! Locator: a selector bound to an optional origin scope.
//!
//! Registries hand out [`Locator`]s; nothing touches the DOM until one of the
//! async methods is given a [`PomDriver`]. A locator that carries an origin
//! switches the driver into that origin for the duration of the call and
//! switches back afterwards, whether or not the call succeeded.

use crate::driver::{ElementHandle, PomDriver};
use crate::result::{PomError, PomResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tracing::{debug, warn};

/// A selector string plus the origin it must be resolved in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin: Option<String>,
}

impl Locator {
    /// Create a locator resolved in the current browsing context
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            origin: None,
        }
    }

    /// Bind the locator to a cross-origin scope
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Get the selector
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Get the origin scope, if any
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Whether resolution needs an origin switch
    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        self.origin.is_some()
    }

    /// Query every element matching the selector
    pub async fn elements<D>(&self, driver: &D) -> PomResult<Vec<ElementHandle>>
    where
        D: PomDriver + ?Sized,
    {
        self.within_origin(driver, driver.query_selector_all(&self.selector))
            .await
    }

    /// Count the elements matching the selector
    pub async fn count<D>(&self, driver: &D) -> PomResult<usize>
    where
        D: PomDriver + ?Sized,
    {
        Ok(self.elements(driver).await?.len())
    }

    /// Click the located element
    pub async fn click<D>(&self, driver: &D) -> PomResult<()>
    where
        D: PomDriver + ?Sized,
    {
        self.within_origin(driver, driver.click(&self.selector)).await
    }

    /// Type text into the located element
    pub async fn type_text<D>(&self, driver: &D, text: &str) -> PomResult<()>
    where
        D: PomDriver + ?Sized,
    {
        self.within_origin(driver, driver.type_text(&self.selector, text))
            .await
    }

    /// Assert that exactly `expected` elements match, returning the count
    pub async fn expect_count<D>(&self, driver: &D, expected: usize) -> PomResult<usize>
    where
        D: PomDriver + ?Sized,
    {
        let actual = self.count(driver).await?;
        if actual != expected {
            return Err(PomError::AssertionFailed {
                message: format!(
                    "expected {expected} element(s) for '{}', found {actual}",
                    self.selector
                ),
            });
        }
        Ok(actual)
    }

    async fn within_origin<D, F, T>(&self, driver: &D, op: F) -> PomResult<T>
    where
        D: PomDriver + ?Sized,
        F: Future<Output = PomResult<T>>,
    {
        let Some(origin) = self.origin.as_deref() else {
            return op.await;
        };

        debug!(origin, selector = %self.selector, "entering origin scope");
        driver.enter_origin(origin).await?;
        let result = op.await;
        let exited = driver.exit_origin().await;
        debug!(origin, ok = result.is_ok(), "left origin scope");

        match (result, exited) {
            (Err(err), Err(exit_err)) => {
                warn!(origin, error = %exit_err, "failed to leave origin after a failed action");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(_), Err(exit_err)) => Err(exit_err),
            (Ok(value), Ok(())) => Ok(value),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{} @ {origin}", self.selector),
            None => write!(f, "{}", self.selector),
        }
    }
}
