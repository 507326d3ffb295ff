//! Run the selected sweepers across the requested regions.

use tracing::{error, info, warn};

use crate::registry::{RegistryError, SweeperRegistry};
use crate::sweep::{RunContext, SweepError, SweepReport};

/// Result of one sweeper in one region.
#[derive(Debug)]
pub struct SweepRun {
    pub region: String,
    pub sweeper: String,
    pub result: Result<SweepReport, SweepError>,
}

impl SweepRun {
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(report) if report.is_success())
    }

    /// The combined error for this run, if it failed.
    pub fn error(&self) -> Option<SweepError> {
        match &self.result {
            Ok(report) => report.error(),
            Err(e) => Some(e.clone()),
        }
    }
}

#[derive(Debug, Default)]
pub struct InvocationSummary {
    pub runs: Vec<SweepRun>,
    /// True when a shutdown signal cut the invocation short.
    pub cancelled: bool,
}

impl InvocationSummary {
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.runs.iter().all(SweepRun::is_success)
    }

    pub fn failed_count(&self) -> usize {
        self.runs.iter().filter(|run| !run.is_success()).count()
    }
}

/// Invoke every sweeper matching `filter` in every region, one at a time.
///
/// Fails up front only if `filter` names an unknown sweeper. Sweep failures
/// are collected in the summary; later sweepers still run.
pub async fn invoke(
    registry: &SweeperRegistry,
    regions: &[String],
    filter: &[String],
    ctx: &RunContext,
) -> Result<InvocationSummary, RegistryError> {
    let sweepers = registry.select(filter)?;
    let mut summary = InvocationSummary::default();

    info!(
        event = "core.invoke.started",
        regions = ?regions,
        sweepers = sweepers.len()
    );

    'regions: for region in regions {
        for sweeper in &sweepers {
            if ctx.cancel.is_cancelled() {
                warn!(event = "core.invoke.cancelled", region = %region, sweeper = sweeper.name());
                summary.cancelled = true;
                break 'regions;
            }

            let result = sweeper.sweep(region, ctx).await;
            if let Err(e) = &result {
                error!(
                    event = "core.invoke.sweep_failed",
                    region = %region,
                    sweeper = sweeper.name(),
                    error = %e
                );
            }
            summary.runs.push(SweepRun {
                region: region.clone(),
                sweeper: sweeper.name().to_string(),
                result,
            });
        }
    }

    if ctx.cancel.is_cancelled() {
        summary.cancelled = true;
    }

    info!(
        event = "core.invoke.completed",
        runs = summary.runs.len(),
        failed = summary.failed_count(),
        cancelled = summary.cancelled
    );

    Ok(summary)
}
