//! Test session: driver, feature mapping and sequencer in one place
//!
//! This is the command surface a test talks to. It resolves feature
//! entries, queries the driver and runs paced step lists and plans.

use crate::config::PomConfig;
use crate::driver::{ElementHandle, PomDriver};
use crate::features::FeatureMap;
use crate::locator::Locator;
use crate::plan::{PlanAction, StepPlan, Target};
use crate::result::PomResult;
use crate::sequencer::{step, Pause, Sequencer, Step, StepDelay, TokioPause};
use tracing::{debug, info};

/// Result of one plan step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The action completed
    Done,
    /// An assertion matched this many elements
    Count(usize),
}

/// Driver plus feature mapping plus pacing
#[derive(Debug)]
pub struct Session<D, P = TokioPause> {
    driver: D,
    features: FeatureMap,
    sequencer: Sequencer<P>,
}

impl<D: PomDriver> Session<D> {
    /// Create a session with the default sequencer
    #[must_use]
    pub fn new(driver: D, features: FeatureMap) -> Self {
        Self::with_sequencer(driver, features, Sequencer::new())
    }

    /// Create a session from configuration (delay and feature mapping)
    pub fn from_config(driver: D, config: &PomConfig) -> PomResult<Self> {
        let features = config.load_features()?;
        let sequencer = Sequencer::new().with_delay(config.step_delay());
        Ok(Self::with_sequencer(driver, features, sequencer))
    }
}

impl<D: PomDriver, P: Pause> Session<D, P> {
    /// Create a session with an explicit sequencer
    #[must_use]
    pub const fn with_sequencer(driver: D, features: FeatureMap, sequencer: Sequencer<P>) -> Self {
        Self {
            driver,
            features,
            sequencer,
        }
    }

    /// The underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// The feature mapping
    #[must_use]
    pub const fn features(&self) -> &FeatureMap {
        &self.features
    }

    /// The sequencer
    #[must_use]
    pub const fn sequencer(&self) -> &Sequencer<P> {
        &self.sequencer
    }

    /// Resolve a feature entry to a locator
    pub fn locate(&self, feature: &str, element: &str) -> PomResult<Locator> {
        self.features.locate(feature, element)
    }

    /// Resolve a feature entry and query its elements
    pub async fn by_feature(&self, feature: &str, element: &str) -> PomResult<Vec<ElementHandle>> {
        let locator = self.locate(feature, element)?;
        debug!(feature, element, %locator, "querying feature element");
        locator.elements(&self.driver).await
    }

    /// Run steps with the configured delay
    pub async fn run_steps<'a, T>(&self, steps: Vec<Step<'a, T>>) -> PomResult<Option<T>> {
        self.sequencer.run(steps).await
    }

    /// Run steps with an explicit delay
    pub async fn run_steps_with_delay<'a, T>(
        &self,
        steps: Vec<Step<'a, T>>,
        delay: StepDelay,
    ) -> PomResult<Option<T>> {
        self.sequencer.run_with_delay(steps, delay).await
    }

    /// Execute a plan.
    ///
    /// Feature targets are resolved when their step runs, so a bad entry
    /// late in the plan only fails once the earlier steps have run.
    pub async fn run_plan(&self, plan: &StepPlan) -> PomResult<Option<StepOutcome>> {
        let delay = plan.effective_delay(self.sequencer.delay());
        info!(steps = plan.len(), %delay, "running plan");
        let steps: Vec<Step<'_, StepOutcome>> = plan
            .steps()
            .iter()
            .map(|action| step(move || self.perform(action)))
            .collect();
        self.sequencer.run_with_delay(steps, delay).await
    }

    async fn perform(&self, action: &PlanAction) -> PomResult<StepOutcome> {
        debug!(%action, "performing plan step");
        match action {
            PlanAction::Visit(url) => {
                self.driver.navigate(url).await?;
                Ok(StepOutcome::Done)
            }
            PlanAction::Click(target) => {
                self.resolve_target(target)?.click(&self.driver).await?;
                Ok(StepOutcome::Done)
            }
            PlanAction::Type(typing) => {
                self.resolve_target(&typing.target)?
                    .type_text(&self.driver, &typing.text)
                    .await?;
                Ok(StepOutcome::Done)
            }
            PlanAction::ExpectCount(expect) => self
                .resolve_target(&expect.target)?
                .expect_count(&self.driver, expect.count)
                .await
                .map(StepOutcome::Count),
        }
    }

    fn resolve_target(&self, target: &Target) -> PomResult<Locator> {
        match target {
            Target::Feature { feature, element } => self.locate(feature, element),
            Target::Selector { selector } => Ok(Locator::new(selector.as_str())),
        }
    }
}
