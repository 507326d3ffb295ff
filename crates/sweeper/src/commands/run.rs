use std::future::Future;

use clap::ArgMatches;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use sweeper_core::{
    InvocationSummary, RunContext, SweepOptions, SweeperRegistry, invoke, wait_for_shutdown_signal,
};

use super::json_types::InvocationJson;
use super::load_config;
use crate::{color, table};

#[derive(Debug, Default)]
pub(crate) struct RunArgs {
    pub regions: Vec<String>,
    pub sweepers: Vec<String>,
    pub concurrency: Option<usize>,
    pub allow_failures: bool,
    pub json: bool,
}

impl RunArgs {
    fn from_matches(matches: &ArgMatches) -> Self {
        let list = |id: &str| -> Vec<String> {
            matches
                .get_many::<String>(id)
                .map(|values| {
                    values
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            regions: list("region"),
            sweepers: list("sweepers"),
            concurrency: matches.get_one::<usize>("concurrency").copied(),
            allow_failures: matches.get_flag("allow-failures"),
            json: matches.get_flag("json"),
        }
    }
}

pub(crate) async fn handle_run_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let args = RunArgs::from_matches(matches);

    info!(
        event = "cli.run_started",
        regions = ?args.regions,
        sweepers = ?args.sweepers,
        json_output = args.json
    );

    let config = load_config()?.with_overrides(args.regions.clone(), args.concurrency);
    if let Err(e) = config.validate() {
        eprintln!("{}", color::error(&e.to_string()));
        error!(event = "cli.run_failed", error = %e);
        return Err(e.into());
    }

    if config.sweep.regions.is_empty() {
        eprintln!(
            "{}",
            color::error("No target region. Pass --region or set sweep.regions in the config file.")
        );
        error!(event = "cli.run_failed", reason = "no_regions");
        return Err("No target region".into());
    }

    let registry = sweeper_aws::default_registry(&config)?;

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(watch_for_shutdown(wait_for_shutdown_signal(cancel.clone())));
    let ctx = RunContext::new(SweepOptions::from_config(&config), cancel);

    let result = run_sweeps(&registry, &config.sweep.regions, &args, &ctx).await;

    watcher.abort();
    result
}

/// Drive the signal watcher. Returns false if it could not be installed, in
/// which case the run continues but cannot be interrupted cleanly.
async fn watch_for_shutdown<F>(signal: F) -> bool
where
    F: Future<Output = Result<(), std::io::Error>>,
{
    match signal.await {
        Ok(()) => true,
        Err(e) => {
            error!(event = "cli.shutdown_watcher_failed", error = %e);
            eprintln!("{}", color::warning(&format!("Signal handling unavailable: {e}")));
            false
        }
    }
}

async fn run_sweeps(
    registry: &SweeperRegistry,
    regions: &[String],
    args: &RunArgs,
    ctx: &RunContext,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = match invoke(registry, regions, &args.sweepers, ctx).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{}", color::error(&e.to_string()));
            error!(event = "cli.run_failed", error = %e);
            return Err(e.into());
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&InvocationJson::from(&summary))?
        );
    } else {
        print_summary(&summary);
    }

    if summary.is_success() {
        info!(event = "cli.run_completed", runs = summary.runs.len());
        return Ok(());
    }

    if args.allow_failures {
        warn!(
            event = "cli.run_completed_with_failures",
            failed = summary.failed_count(),
            cancelled = summary.cancelled
        );
        return Ok(());
    }

    error!(
        event = "cli.run_failed",
        failed = summary.failed_count(),
        cancelled = summary.cancelled
    );
    if summary.cancelled && summary.failed_count() == 0 {
        Err("Sweep cancelled".into())
    } else {
        Err(format!("{} sweep(s) failed", summary.failed_count()).into())
    }
}

fn print_summary(summary: &InvocationSummary) {
    if summary.runs.is_empty() {
        println!("No sweeps were run.");
        return;
    }

    table::print_runs_table(&summary.runs);

    for run in &summary.runs {
        if let Ok(report) = &run.result
            && let Some(reason) = report.region_skipped()
        {
            eprintln!(
                "{}",
                color::warning(&format!(
                    "Skipped {} in {}: {}",
                    run.sweeper, run.region, reason
                ))
            );
        }
        if let Some(e) = run.error() {
            eprintln!("{}", color::error(&e.to_string()));
        }
    }

    if summary.cancelled {
        eprintln!("{}", color::warning("Sweep cancelled; results above are partial."));
    }
}
