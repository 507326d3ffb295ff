use serde::Serialize;
use sweeper_core::{InvocationSummary, SweepReport, SweepRun};

use crate::table::status_label;

/// Output of `sweeper list --json`.
#[derive(Serialize)]
pub struct SweeperListJson<'a> {
    pub sweepers: Vec<&'a str>,
}

/// One sweeper/region pair in `sweeper run --json` output.
#[derive(Serialize)]
pub struct SweepRunJson<'a> {
    pub region: &'a str,
    pub sweeper: &'a str,
    pub status: &'static str,
    /// Present whenever the sweep got as far as listing.
    pub report: Option<&'a SweepReport>,
    /// Combined error message, one failure per line.
    pub error: Option<String>,
}

impl<'a> From<&'a SweepRun> for SweepRunJson<'a> {
    fn from(run: &'a SweepRun) -> Self {
        Self {
            region: &run.region,
            sweeper: &run.sweeper,
            status: status_label(run),
            report: run.result.as_ref().ok(),
            error: run.error().map(|e| e.to_string()),
        }
    }
}

/// Output of `sweeper run --json`.
#[derive(Serialize)]
pub struct InvocationJson<'a> {
    pub success: bool,
    pub cancelled: bool,
    pub runs: Vec<SweepRunJson<'a>>,
}

impl<'a> From<&'a InvocationSummary> for InvocationJson<'a> {
    fn from(summary: &'a InvocationSummary) -> Self {
        Self {
            success: summary.is_success(),
            cancelled: summary.cancelled,
            runs: summary.runs.iter().map(SweepRunJson::from).collect(),
        }
    }
}
