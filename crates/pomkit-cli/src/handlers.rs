//! Subcommand implementations

use crate::commands::{CheckArgs, LookupArgs, PlanArgs};
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use pomkit::{FeatureMap, PomConfig, StepDelay, StepPlan, Target};
use tracing::debug;

/// `pomkit check <FILE>`
pub fn check(reporter: &Reporter, args: &CheckArgs) -> CliResult<()> {
    let features = FeatureMap::from_path(&args.file)?;
    let mapping = features.mapping()?;

    reporter.header(&args.file.display().to_string());
    for namespace in mapping.namespaces() {
        let elements = mapping.namespace(namespace)?.len();
        reporter.result(&format!("{namespace}: {elements} element(s)"));
    }
    reporter.result(&format!(
        "{} feature(s), {} element(s)",
        mapping.len(),
        mapping.element_count()
    ));
    reporter.success("feature mapping is valid");
    Ok(())
}

/// `pomkit lookup <FILE> <FEATURE> <ELEMENT>`
pub fn lookup(reporter: &Reporter, args: &LookupArgs) -> CliResult<()> {
    let locator = FeatureMap::from_path(&args.file)?.locate(&args.feature, &args.element)?;
    debug!(feature = %args.feature, element = %args.element, %locator, "resolved");
    reporter.result(locator.selector());
    Ok(())
}

/// `pomkit plan <FILE> [--features FILE] [--delay MS]`
pub fn plan(reporter: &Reporter, args: &PlanArgs, config: &PomConfig) -> CliResult<()> {
    let plan = StepPlan::from_path(&args.file)?;
    if let Some(path) = &args.features {
        check_targets(&plan, &FeatureMap::from_path(path)?)?;
    }

    let default = args.delay.unwrap_or_else(|| config.step_delay());
    let delay = plan.effective_delay(default);

    reporter.header(&args.file.display().to_string());
    for line in schedule(&plan, delay) {
        let line = if line.trim_start().starts_with("wait ") {
            reporter.dim(&line)
        } else {
            line
        };
        reporter.result(&line);
    }
    reporter.result(&format!(
        "pacing overhead: {}ms ({} step(s), delay {delay})",
        plan.pacing_overhead(default).as_millis(),
        plan.len()
    ));
    reporter.success("plan is valid");
    Ok(())
}

/// Every feature target of the plan must resolve in `features`
pub fn check_targets(plan: &StepPlan, features: &FeatureMap) -> CliResult<()> {
    for (index, action) in plan.steps().iter().enumerate() {
        if let Some(Target::Feature { feature, element }) = action.target() {
            features
                .locate(feature, element)
                .map_err(|e| CliError::plan_validation(format!("step {}: {e}", index + 1)))?;
        }
    }
    Ok(())
}

/// Numbered steps with the pauses between them
#[must_use]
pub fn schedule(plan: &StepPlan, delay: StepDelay) -> Vec<String> {
    let mut lines = Vec::with_capacity(plan.len() * 2);
    for (index, action) in plan.steps().iter().enumerate() {
        if index > 0 {
            lines.push(format!("     wait {delay}"));
        }
        lines.push(format!("{:>3}. {action}", index + 1));
    }
    lines
}
