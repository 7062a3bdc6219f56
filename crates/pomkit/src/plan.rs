//! Declarative step plans
//!
//! A plan is a YAML or JSON document listing UI actions to run through the
//! [`Sequencer`](crate::sequencer::Sequencer):
//!
//! ```yaml
//! delay_ms: 200
//! steps:
//!   - visit: "https://shop.example.com"
//!   - click: { feature: HOME, element: NEXT_ITEMS }
//!   - type: { selector: "input#search", text: "laptop" }
//!   - expect_count: { feature: HOME, element: ITEMS, count: 6 }
//! ```
//!
//! Targets are either a raw `selector` or a `feature`/`element` pair looked
//! up in the feature mapping when the step runs.

use crate::document::{parse_json, parse_yaml};
use crate::result::{PomError, PomResult};
use crate::sequencer::{pacing_overhead, StepDelay};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// What a plan step acts on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// Entry of the feature mapping
    Feature {
        /// Feature (namespace) name
        feature: String,
        /// Element name within the feature
        element: String,
    },
    /// Raw selector
    Selector {
        /// Selector string
        selector: String,
    },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature { feature, element } => write!(f, "{feature}/{element}"),
            Self::Selector { selector } => write!(f, "'{selector}'"),
        }
    }
}

/// Text entry into a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAction {
    /// Element receiving the text
    #[serde(flatten)]
    pub target: Target,
    /// Text to type
    pub text: String,
}

/// Element-count assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectCountAction {
    /// Elements to count
    #[serde(flatten)]
    pub target: Target,
    /// Expected number of matches
    pub count: usize,
}

/// A single plan step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    /// Navigate to a URL
    Visit(String),
    /// Click a target
    Click(Target),
    /// Type into a target
    Type(TypeAction),
    /// Assert how many elements match a target
    ExpectCount(ExpectCountAction),
}

impl PlanAction {
    /// Target of the action, if it has one
    #[must_use]
    pub const fn target(&self) -> Option<&Target> {
        match self {
            Self::Visit(_) => None,
            Self::Click(target) => Some(target),
            Self::Type(action) => Some(&action.target),
            Self::ExpectCount(action) => Some(&action.target),
        }
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visit(url) => write!(f, "visit {url}"),
            Self::Click(target) => write!(f, "click {target}"),
            Self::Type(action) => write!(f, "type {:?} into {}", action.text, action.target),
            Self::ExpectCount(action) => {
                write!(f, "expect {} x {}", action.count, action.target)
            }
        }
    }
}

/// Parsed, validated plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    delay: Option<StepDelay>,
    steps: Vec<PlanAction>,
}

impl StepPlan {
    /// Build a plan directly
    #[must_use]
    pub const fn new(steps: Vec<PlanAction>) -> Self {
        Self { delay: None, steps }
    }

    /// Override the inter-step delay
    #[must_use]
    pub const fn with_delay(mut self, delay: StepDelay) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Validate a dynamic document.
    ///
    /// `steps` must be a sequence and `delay_ms`, when present, a
    /// non-negative integer; both fail with `InvalidArgument` otherwise.
    pub fn from_value(value: &Value) -> PomResult<Self> {
        let Value::Object(doc) = value else {
            return Err(PomError::invalid_argument("a plan must be a mapping"));
        };

        let delay = match doc.get("delay_ms") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(StepDelay::try_from(raw)?),
        };

        let Some(Value::Array(raw_steps)) = doc.get("steps") else {
            return Err(PomError::invalid_argument("steps must be a sequence"));
        };

        let steps = raw_steps
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_value(raw.clone()).map_err(|e| {
                    PomError::invalid_argument(format!("step {}: {e}", index + 1))
                })
            })
            .collect::<PomResult<Vec<PlanAction>>>()?;

        debug!(steps = steps.len(), ?delay, "step plan parsed");
        Ok(Self { delay, steps })
    }

    /// Parse a JSON plan
    pub fn from_json_str(json: &str) -> PomResult<Self> {
        let value = parse_json(json)?;
        Self::from_value(&value)
    }

    /// Parse a YAML plan
    pub fn from_yaml_str(yaml: &str) -> PomResult<Self> {
        let value = parse_yaml(yaml)?;
        Self::from_value(&value)
    }

    /// Load a plan file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> PomResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Delay declared by the plan itself
    #[must_use]
    pub const fn delay(&self) -> Option<StepDelay> {
        self.delay
    }

    /// Declared delay, else `default`
    #[must_use]
    pub fn effective_delay(&self, default: StepDelay) -> StepDelay {
        self.delay.unwrap_or(default)
    }

    /// Steps in execution order
    #[must_use]
    pub fn steps(&self) -> &[PlanAction] {
        &self.steps
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time the plan spends pausing between steps
    #[must_use]
    pub fn pacing_overhead(&self, default: StepDelay) -> Duration {
        pacing_overhead(self.effective_delay(default), self.steps.len())
    }
}
