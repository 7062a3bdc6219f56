//! Paced step sequencing
//!
//! Runs an ordered list of async UI actions one after another with a fixed
//! settle delay between consecutive steps. UI automation races against
//! asynchronous rendering; a uniform pause between actions is a blunt but
//! dependable way to let the page catch up.
//!
//! **Cost:** a run of `n` steps spends `(n - 1) × delay` just waiting. With the
//! default 300ms, twenty steps add almost six seconds to a test. Use
//! [`Sequencer::pacing_overhead`] to see the bill, and pass
//! [`StepDelay::ZERO`] when the page does not need settling.
//!
//! ```text
//!  step 1 ──► pause ──► step 2 ──► pause ──► step 3 ──► result of step 3
//! ```
//!
//! No retries, no branching, no parallelism: the first failing step aborts
//! the run and its error is returned as-is.

use crate::result::{PomError, PomResult};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, trace};

/// Default settle time between steps (300ms)
pub const DEFAULT_STEP_DELAY_MS: u64 = 300;

const WAIT_MUST_BE_NUMBER: &str = "The wait must be a number";

/// One deferred UI action.
///
/// The closure is invoked only when its turn comes, so nothing runs at
/// construction time.
pub type Step<'a, T> = Box<dyn FnOnce() -> BoxFuture<'a, PomResult<T>> + Send + 'a>;

/// Box a closure returning a future into a [`Step`].
pub fn step<'a, F, Fut, T>(action: F) -> Step<'a, T>
where
    F: FnOnce() -> Fut + Send + 'a,
    Fut: Future<Output = PomResult<T>> + Send + 'a,
{
    Box::new(move || action().boxed())
}

/// Non-negative pause inserted between consecutive steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepDelay(Duration);

impl StepDelay {
    /// No pause at all
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Create a delay from milliseconds
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Get the delay as a Duration
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Get the delay in whole milliseconds, saturating at `u64::MAX`
    #[must_use]
    pub fn as_millis(self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for StepDelay {
    fn default() -> Self {
        Self::from_millis(DEFAULT_STEP_DELAY_MS)
    }
}

impl From<Duration> for StepDelay {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl fmt::Display for StepDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

impl FromStr for StepDelay {
    type Err = PomError;

    /// Accepts `"250"`, `"250ms"` and `"2s"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PomError::invalid_argument(format!("{WAIT_MUST_BE_NUMBER} (got {s:?})"));
        let (digits, scale) = if let Some(ms) = s.strip_suffix("ms") {
            (ms, 1)
        } else if let Some(secs) = s.strip_suffix('s') {
            (secs, 1000)
        } else {
            (s, 1)
        };
        let value: u64 = digits.trim().parse().map_err(|_| invalid())?;
        value
            .checked_mul(scale)
            .map(Self::from_millis)
            .ok_or_else(invalid)
    }
}

impl TryFrom<&Value> for StepDelay {
    type Error = PomError;

    /// Accepts non-negative integral numbers of milliseconds.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let invalid = || {
            PomError::invalid_argument(format!("{WAIT_MUST_BE_NUMBER} of milliseconds >= 0 (got {value})"))
        };
        let Value::Number(number) = value else {
            return Err(invalid());
        };
        if let Some(ms) = number.as_u64() {
            return Ok(Self::from_millis(ms));
        }
        match number.as_f64() {
            Some(ms) if ms.is_finite() && ms >= 0.0 && ms.fract() == 0.0 && ms <= u64::MAX as f64 => {
                Ok(Self::from_millis(ms as u64))
            }
            _ => Err(invalid()),
        }
    }
}

/// The delay capability: suspend the current chain for a while.
#[async_trait]
pub trait Pause: Send + Sync {
    /// Suspend for `duration`
    async fn pause(&self, duration: Duration);
}

/// [`Pause`] backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs steps strictly in order with a pause between each pair.
#[derive(Debug, Clone)]
pub struct Sequencer<P = TokioPause> {
    delay: StepDelay,
    pause: P,
}

impl Sequencer<TokioPause> {
    /// Create a sequencer with the default delay and tokio timers
    #[must_use]
    pub fn new() -> Self {
        Self::with_pause(TokioPause)
    }
}

impl Default for Sequencer<TokioPause> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Pause> Sequencer<P> {
    /// Create a sequencer with a custom delay capability
    #[must_use]
    pub fn with_pause(pause: P) -> Self {
        Self {
            delay: StepDelay::default(),
            pause,
        }
    }

    /// Set the delay used by [`Self::run`]
    #[must_use]
    pub const fn with_delay(mut self, delay: StepDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Delay used when none is given explicitly
    #[must_use]
    pub const fn delay(&self) -> StepDelay {
        self.delay
    }

    /// Time a run of `steps` steps spends pausing with the configured delay
    #[must_use]
    pub fn pacing_overhead(&self, steps: usize) -> Duration {
        pacing_overhead(self.delay, steps)
    }

    /// Run steps with the configured delay.
    ///
    /// Returns the output of the last step, or `None` for an empty list.
    pub async fn run<'a, T, I>(&self, steps: I) -> PomResult<Option<T>>
    where
        I: IntoIterator<Item = Step<'a, T>>,
    {
        self.run_with_delay(steps, self.delay).await
    }

    /// Run steps with an explicit delay (`StepDelay::ZERO` is allowed).
    ///
    /// Step `i + 1` is not invoked before step `i` has settled and `delay`
    /// has elapsed. There is no pause before the first step or after the
    /// last. A failing step ends the run immediately.
    pub async fn run_with_delay<'a, T, I>(&self, steps: I, delay: StepDelay) -> PomResult<Option<T>>
    where
        I: IntoIterator<Item = Step<'a, T>>,
    {
        let mut last = None;
        for (index, step) in steps.into_iter().enumerate() {
            if index > 0 {
                trace!(%delay, before_step = index + 1, "pausing between steps");
                self.pause.pause(delay.as_duration()).await;
            }
            debug!(step = index + 1, "running step");
            match step().await {
                Ok(output) => {
                    trace!(step = index + 1, "step settled");
                    last = Some(output);
                }
                Err(err) => {
                    debug!(step = index + 1, error = %err, "step failed, aborting sequence");
                    return Err(err);
                }
            }
        }
        Ok(last)
    }
}

/// `(steps - 1) × delay`, saturating
#[must_use]
pub fn pacing_overhead(delay: StepDelay, steps: usize) -> Duration {
    let gaps = u32::try_from(steps.saturating_sub(1)).unwrap_or(u32::MAX);
    delay.as_duration().saturating_mul(gaps)
}
