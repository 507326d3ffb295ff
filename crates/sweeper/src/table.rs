use sweeper_core::{FailureStage, SweepRun};

use crate::color;

/// Short status word for one sweep run.
pub fn status_label(run: &SweepRun) -> &'static str {
    match &run.result {
        Err(_) => "failed",
        Ok(report)
            if report
                .failures()
                .iter()
                .any(|f| f.stage == FailureStage::Cancelled) =>
        {
            "cancelled"
        }
        Ok(report) if !report.is_success() => "failed",
        Ok(report) if report.region_skipped().is_some() => "region skipped",
        Ok(_) => "succeeded",
    }
}

/// Succeeded, skipped, and failed identifier counts for one run.
///
/// Listing errors and cancellation carry no identifier, so they show up in the
/// status column rather than in the failed count.
pub fn outcome_counts(run: &SweepRun) -> (String, String, String) {
    match &run.result {
        Ok(report) => (
            report.succeeded_count().to_string(),
            report.skipped_count().to_string(),
            report.failed_count().to_string(),
        ),
        Err(_) => ("-".to_string(), "-".to_string(), "-".to_string()),
    }
}

/// Print a formatted table of sweep runs
pub fn print_runs_table(runs: &[SweepRun]) {
    let region_width = runs
        .iter()
        .map(|r| r.region.chars().count())
        .max()
        .unwrap_or(6)
        .clamp(6, 20);
    let sweeper_width = runs
        .iter()
        .map(|r| r.sweeper.chars().count())
        .max()
        .unwrap_or(7)
        .clamp(7, 32);
    let count_width = 9;
    let status_width = 14;

    println!(
        "┌{}┬{}┬{}┬{}┬{}┬{}┐",
        "─".repeat(region_width + 2),
        "─".repeat(sweeper_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(status_width + 2),
    );
    println!(
        "│ {} │ {} │ {} │ {} │ {} │ {} │",
        color::bold(&truncate("Region", region_width)),
        color::bold(&truncate("Sweeper", sweeper_width)),
        color::bold(&truncate("Succeeded", count_width)),
        color::bold(&truncate("Skipped", count_width)),
        color::bold(&truncate("Failed", count_width)),
        color::bold(&truncate("Status", status_width)),
    );
    println!(
        "├{}┼{}┼{}┼{}┼{}┼{}┤",
        "─".repeat(region_width + 2),
        "─".repeat(sweeper_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(status_width + 2),
    );

    for run in runs {
        let (succeeded, skipped, failed) = outcome_counts(run);
        let status = status_label(run);

        println!(
            "│ {} │ {} │ {:>count_width$} │ {:>count_width$} │ {:>count_width$} │ {} │",
            color::ice(&truncate(&run.region, region_width)),
            truncate(&run.sweeper, sweeper_width),
            succeeded,
            skipped,
            failed,
            color::status_padded(status, status_width),
            count_width = count_width,
        );
    }

    println!(
        "└{}┴{}┴{}┴{}┴{}┴{}┘",
        "─".repeat(region_width + 2),
        "─".repeat(sweeper_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(count_width + 2),
        "─".repeat(status_width + 2),
    );
}

/// Truncate a string to a maximum display width, padding if shorter.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sweeper_core::sweep::sweep_resources;
    use sweeper_core::testing::FakeResourceApi;
    use sweeper_core::{ApiError, ClientError, ResourceApi, SweepError, SweepOptions, SweepReport};
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_truncate_pads_and_shortens() {
        assert_eq!(truncate("abc", 5), "abc  ");
        assert_eq!(truncate("aws_api_gateway_vpc_link", 10), "aws_api...");
    }

    #[test]
    fn test_status_label() {
        let ok = SweepRun {
            region: "us-west-2".to_string(),
            sweeper: "aws_kms_key".to_string(),
            result: Ok(SweepReport::new("aws_kms_key", "us-west-2")),
        };
        assert_eq!(status_label(&ok), "succeeded");

        let client_failure = SweepRun {
            region: "us-west-2".to_string(),
            sweeper: "aws_kms_key".to_string(),
            result: Err(SweepError::Client {
                resource_type: "aws_kms_key".to_string(),
                region: "us-west-2".to_string(),
                source: ClientError::SetupFailed {
                    region: "us-west-2".to_string(),
                    message: "no credentials".to_string(),
                },
            }),
        };
        assert_eq!(status_label(&client_failure), "failed");
    }

    #[tokio::test]
    async fn test_failed_column_counts_only_identifiers() {
        let api: Arc<dyn ResourceApi> = Arc::new(
            FakeResourceApi::new("widget")
                .with_page(&["a", "b"])
                .with_page_error(ApiError::other("ListWidgets", "internal error"))
                .with_delete_error("b", ApiError::other("DeleteWidget", "boom")),
        );
        let report = sweep_resources(
            api,
            "us-west-2",
            &SweepOptions::default(),
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(report.failures().len(), 2);

        let run = SweepRun {
            region: "us-west-2".to_string(),
            sweeper: "widget".to_string(),
            result: Ok(report),
        };
        let (succeeded, skipped, failed) = outcome_counts(&run);
        assert_eq!((succeeded.as_str(), skipped.as_str()), ("1", "0"));
        assert_eq!(failed, "1");
        assert_eq!(status_label(&run), "failed");
    }
}
