//! Bounded, cancellable execution of deletes.

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::ApiError;

use super::adapter::Sweepable;
use super::report::{FailureStage, SweepReport};

/// Delete every sweepable with at most `concurrency` calls in flight.
///
/// A failed delete is recorded and the rest still run. Once `cancel` fires no
/// further delete is started; calls already in flight run to completion and
/// keep their outcome. The number of sweepables never started is recorded on
/// the report.
///
/// The returned report carries the resource type of the sweepables but no
/// region; it is meant to be merged into the sweep's own report.
pub async fn run(
    sweepables: Vec<Box<dyn Sweepable>>,
    concurrency: usize,
    cancel: &CancellationToken,
) -> SweepReport {
    let resource_type = sweepables
        .first()
        .map(|s| s.resource_type().to_string())
        .unwrap_or_default();
    let mut report = SweepReport::new(resource_type.as_str(), "");
    let total = sweepables.len();
    if total == 0 {
        return report;
    }

    info!(
        event = "core.sweep.delete_started",
        resource_type = %resource_type,
        count = total,
        concurrency = concurrency
    );

    // Boxed before entering the stream; the sweep future must be Send
    let deletions: Vec<BoxFuture<'static, Option<Deletion>>> = sweepables
        .into_iter()
        .map(|sweepable| {
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return None;
                }
                let result = sweepable.delete().await;
                Some((sweepable, result))
            }
            .boxed()
        })
        .collect();
    let mut deletions = stream::iter(deletions).buffer_unordered(concurrency.max(1));

    let mut attempted = 0;
    while let Some(deletion) = deletions.next().await {
        let Some((sweepable, result)) = deletion else {
            continue;
        };
        attempted += 1;
        match result {
            Ok(()) => {
                debug!(
                    event = "core.sweep.delete_completed",
                    resource_type = sweepable.resource_type(),
                    identifier = sweepable.id()
                );
                report.record_success(sweepable.resource_type(), sweepable.id());
            }
            // Already gone is as good as deleted
            Err(e) if e.is_not_found() => {
                debug!(
                    event = "core.sweep.delete_completed",
                    resource_type = sweepable.resource_type(),
                    identifier = sweepable.id(),
                    already_gone = true
                );
                report.record_success(sweepable.resource_type(), sweepable.id());
            }
            Err(e) => {
                warn!(
                    event = "core.sweep.delete_failed",
                    resource_type = sweepable.resource_type(),
                    identifier = sweepable.id(),
                    error = %e
                );
                report.record_failure(
                    sweepable.resource_type(),
                    sweepable.id(),
                    FailureStage::Delete,
                    e.to_string(),
                );
            }
        }
    }

    if attempted < total {
        warn!(
            event = "core.sweep.delete_cancelled",
            resource_type = %resource_type,
            attempted = attempted,
            not_attempted = total - attempted
        );
        report.mark_cancelled(total - attempted);
    } else {
        info!(
            event = "core.sweep.delete_completed",
            resource_type = %resource_type,
            succeeded = report.succeeded_count(),
            failed = report.failed_count()
        );
    }

    report
}

type Deletion = (Box<dyn Sweepable>, Result<(), ApiError>);
