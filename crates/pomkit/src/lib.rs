//! Pomkit: page objects as data for UI end-to-end tests
//!
//! Selector registries keep every CSS selector of a suite in one place and
//! resolve logical names to [`Locator`]s. A paced [`Sequencer`] runs UI
//! actions in order with a settle delay between them, and a [`FeatureMap`]
//! exposes a `feature -> element -> selector` mapping supplied by the test
//! runner.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ElementRegistry / NestedRegistry / FeatureMap                │
//! │        │ resolve / resolve_scoped / locate                    │
//! │        ▼                                                      │
//! │     Locator ──(optional origin switch)──► PomDriver           │
//! │        ▲                                                      │
//! │  Sequencer: step ─► pause ─► step ─► pause ─► step            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pomkit::{nested_elements, MockDriver, PomError};
//!
//! # futures::executor::block_on(async {
//! let site = nested_elements! {
//!     HOME => { ITEMS => "div#list > div", NEXT => "button#next" },
//! }?;
//! let driver = MockDriver::new().with_elements("div#list > div", 6);
//!
//! let items = site.resolve("HOME", "ITEMS")?;
//! assert_eq!(items.count(&driver).await?, 6);
//! # Ok::<(), PomError>(())
//! # }).unwrap();
//! ```

#![warn(missing_docs)]

pub mod config;
mod document;
mod driver;
pub mod features;
mod locator;
pub mod logging;
pub mod plan;
pub mod registry;
mod result;
pub mod sequencer;
pub mod session;

pub use config::PomConfig;
pub use driver::{ElementHandle, MockDriver, PomDriver};
pub use features::FeatureMap;
pub use locator::Locator;
pub use logging::{init_tracing, LogFormat};
pub use plan::{PlanAction, StepPlan, Target};
pub use registry::{validate_key, ElementRegistry, NestedRegistry, OriginScope};
pub use result::{KeyKind, PomError, PomResult};
pub use sequencer::{
    pacing_overhead, step, Pause, Sequencer, Step, StepDelay, TokioPause, DEFAULT_STEP_DELAY_MS,
};
pub use session::{Session, StepOutcome};
