//! One complete sweep: enumerate, classify, adapt, delete.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use sweeper_config::{DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE, SweeperConfig};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::api::ResourceApi;
use crate::clients::RegionalClientCache;
use crate::registry::Sweeper;

use super::adapter::{Sweepable, adapt};
use super::enumerate::{collect_identifiers, enumerate};
use super::errors::SweepError;
use super::filter::{Classification, classify};
use super::orchestrator;
use super::report::{FailureStage, SweepReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    /// Bound on concurrent describe and delete calls.
    pub concurrency: usize,
    /// Requested page size; each resource type clamps it to its own maximum.
    pub page_size: u32,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SweepOptions {
    pub fn from_config(config: &SweeperConfig) -> Self {
        Self {
            concurrency: config.sweep.concurrency,
            page_size: config.sweep.page_size,
        }
    }
}

/// Everything a sweeper needs besides its region.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub options: SweepOptions,
    pub cancel: CancellationToken,
}

impl RunContext {
    pub fn new(options: SweepOptions, cancel: CancellationToken) -> Self {
        Self { options, cancel }
    }
}

/// Sweep every resource `api` can list in `region`.
///
/// Never fails as a whole: enumeration, describe, and delete problems all end
/// up in the returned report.
pub async fn sweep_resources(
    api: Arc<dyn ResourceApi>,
    region: &str,
    options: &SweepOptions,
    cancel: &CancellationToken,
) -> SweepReport {
    let resource_type = api.resource_type().to_string();
    let mut report = SweepReport::new(resource_type.as_str(), region);

    info!(
        event = "core.sweep.enumerate_started",
        resource_type = %resource_type,
        region = region
    );

    let listing = enumerate(Arc::clone(&api), options.page_size);
    let enumeration = collect_identifiers(listing, cancel).await;

    if let Some(e) = enumeration.error {
        if e.is_skip_region() {
            warn!(
                event = "core.sweep.region_skipped",
                resource_type = %resource_type,
                region = region,
                error = %e
            );
            report.mark_region_skipped(e.to_string());
        } else {
            error!(
                event = "core.sweep.enumerate_failed",
                resource_type = %resource_type,
                region = region,
                error = %e
            );
            report.record_enumeration_error(e.to_string());
        }
    }

    // Listings can repeat an identifier across pages
    let mut seen = HashSet::new();
    let identifiers: Vec<String> = enumeration
        .identifiers
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect();
    let total = identifiers.len();

    info!(
        event = "core.sweep.enumerate_completed",
        resource_type = %resource_type,
        region = region,
        count = total
    );

    if enumeration.cancelled {
        report.mark_cancelled(total);
        return report;
    }

    let classifications: Vec<BoxFuture<'static, (String, Classification)>> = identifiers
        .into_iter()
        .map(|id| {
            let api = Arc::clone(&api);
            async move {
                let classification = classify(api.as_ref(), &id).await;
                (id, classification)
            }
            .boxed()
        })
        .collect();
    let classifications = stream::iter(classifications)
        .buffer_unordered(options.concurrency.max(1))
        .take_until(cancel.cancelled());
    let mut classifications = std::pin::pin!(classifications);

    let mut classified = 0;
    let mut sweepables: Vec<Box<dyn Sweepable>> = Vec::new();
    while let Some((id, classification)) = classifications.next().await {
        classified += 1;
        match classification {
            Classification::Proceed(candidate) => sweepables.push(adapt(&api, candidate)),
            Classification::Skip(reason) => report.record_skip(&resource_type, &id, reason),
            Classification::Error(e) => {
                warn!(
                    event = "core.sweep.describe_failed",
                    resource_type = %resource_type,
                    identifier = %id,
                    error = %e
                );
                report.record_failure(&resource_type, &id, FailureStage::Describe, e.to_string());
            }
        }
    }

    if classified < total {
        report.mark_cancelled(total - classified + sweepables.len());
        return report;
    }

    let deletions = orchestrator::run(sweepables, options.concurrency, cancel).await;
    report.merge(deletions);

    if report.is_success() {
        info!(
            event = "core.sweep.sweep_completed",
            resource_type = %resource_type,
            region = region,
            succeeded = report.succeeded_count(),
            skipped = report.skipped_count()
        );
    } else {
        warn!(
            event = "core.sweep.sweep_failed",
            resource_type = %resource_type,
            region = region,
            failures = report.failures().len()
        );
    }

    report
}

type ApiBuilder<C> = Box<dyn Fn(Arc<C>) -> Arc<dyn ResourceApi> + Send + Sync>;

/// A [`Sweeper`] that binds a resource type to the shared regional client.
pub struct RegionalSweeper<C> {
    name: String,
    clients: Arc<RegionalClientCache<C>>,
    build: ApiBuilder<C>,
}

impl<C: Send + Sync + 'static> RegionalSweeper<C> {
    pub fn new(
        name: impl Into<String>,
        clients: Arc<RegionalClientCache<C>>,
        build: impl Fn(Arc<C>) -> Arc<dyn ResourceApi> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            clients,
            build: Box::new(build),
        }
    }
}

#[async_trait]
impl<C: Send + Sync + 'static> Sweeper for RegionalSweeper<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn sweep(&self, region: &str, ctx: &RunContext) -> Result<SweepReport, SweepError> {
        let client = self
            .clients
            .get(region)
            .await
            .map_err(|source| SweepError::Client {
                resource_type: self.name.clone(),
                region: region.to_string(),
                source,
            })?;

        let api = (self.build)(client);
        Ok(sweep_resources(api, region, &ctx.options, &ctx.cancel).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::api::{ApiError, ApiErrorKind, Candidate, LifecycleState};
    use crate::clients::{ClientError, ClientFactory};
    use crate::sweep::report::{SkipReason, SweepOutcome};
    use crate::testing::FakeResourceApi;

    async fn sweep(fake: &Arc<FakeResourceApi>) -> SweepReport {
        let api: Arc<dyn ResourceApi> = fake.clone();
        sweep_resources(
            api,
            "us-west-2",
            &SweepOptions::default(),
            &CancellationToken::new(),
        )
        .await
    }

    #[tokio::test]
    async fn test_skips_never_fail_the_sweep() {
        let fake = Arc::new(
            FakeResourceApi::new("widget")
                .with_page(&["A", "B", "C"])
                .with_describe("B", Err(ApiError::not_found("DescribeWidget", "missing")))
                .with_describe(
                    "C",
                    Err(ApiError::access_denied("DescribeWidget", "not authorized")),
                ),
        );

        let report = sweep(&fake).await;

        assert_eq!(report.outcome("A"), Some(&SweepOutcome::Succeeded));
        assert_eq!(
            report.outcome("B"),
            Some(&SweepOutcome::Skipped(SkipReason::NotFound))
        );
        assert_eq!(
            report.outcome("C"),
            Some(&SweepOutcome::Skipped(SkipReason::AccessDenied))
        );
        assert!(report.is_success());
        assert!(report.into_result().is_ok());
        assert_eq!(fake.deleted_ids(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_delete_failure_fails_only_that_resource() {
        let fake = Arc::new(
            FakeResourceApi::new("widget")
                .with_page(&["A", "B"])
                .with_delete_error("B", ApiError::other("DeleteWidget", "connection reset")),
        );

        let report = sweep(&fake).await;

        assert_eq!(report.outcome("A"), Some(&SweepOutcome::Succeeded));
        assert!(matches!(report.outcome("B"), Some(SweepOutcome::Failed(_))));

        let message = report.into_result().unwrap_err().to_string();
        assert!(message.contains("sweeping widget (B): DeleteWidget: connection reset"));
        assert!(!message.contains("(A)"));
    }

    #[tokio::test]
    async fn test_enumeration_error_keeps_partial_results() {
        let fake = Arc::new(
            FakeResourceApi::new("widget")
                .with_page(&["A"])
                .with_page_error(ApiError::other("ListWidgets", "internal error")),
        );

        let report = sweep(&fake).await;

        assert_eq!(report.outcome("A"), Some(&SweepOutcome::Succeeded));
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].stage, FailureStage::List);
        assert_eq!(
            report.render_failures(),
            "listing widget (us-west-2): ListWidgets: internal error"
        );
    }

    #[tokio::test]
    async fn test_access_denied_while_listing_is_fatal() {
        let fake = Arc::new(
            FakeResourceApi::new("widget")
                .with_page_error(ApiError::access_denied("ListWidgets", "not authorized")),
        );

        let report = sweep(&fake).await;

        assert!(!report.is_success());
        assert!(report.region_skipped().is_none());
    }

    #[tokio::test]
    async fn test_unsupported_region_is_skipped_not_failed() {
        let fake = Arc::new(FakeResourceApi::new("widget").with_page_error(ApiError::new(
            ApiErrorKind::Unsupported,
            "ListWidgets",
            "service not available in this region",
        )));

        let report = sweep(&fake).await;

        assert!(report.is_success());
        assert_eq!(
            report.region_skipped(),
            Some("ListWidgets: service not available in this region")
        );
    }

    #[tokio::test]
    async fn test_describe_error_is_accumulated() {
        let fake = Arc::new(
            FakeResourceApi::new("widget")
                .with_page(&["A", "B", "C"])
                .with_describe("B", Err(ApiError::other("DescribeWidget", "internal")))
                .with_describe(
                    "C",
                    Ok(Candidate::new("C").with_lifecycle(LifecycleState::PendingDeletion)),
                ),
        );

        let report = sweep(&fake).await;

        assert_eq!(report.outcome("A"), Some(&SweepOutcome::Succeeded));
        assert!(matches!(report.outcome("B"), Some(SweepOutcome::Failed(_))));
        assert_eq!(
            report.outcome("C"),
            Some(&SweepOutcome::Skipped(SkipReason::PendingDeletion))
        );
        assert_eq!(
            report.render_failures(),
            "reading widget (B): DescribeWidget: internal"
        );
        assert_eq!(fake.deleted_ids(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_duplicate_identifiers_swept_once() {
        let fake = Arc::new(
            FakeResourceApi::new("widget")
                .with_page(&["A", "B"])
                .with_page(&["B", "C"]),
        );

        let report = sweep(&fake).await;

        assert_eq!(fake.delete_calls(), 3);
        assert_eq!(report.log().len(), 3);
        assert_eq!(report.succeeded_count(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_sweep_reports_not_attempted() {
        let fake = Arc::new(FakeResourceApi::new("widget").with_page(&["A", "B"]));
        let api: Arc<dyn ResourceApi> = fake.clone();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = sweep_resources(api, "us-west-2", &SweepOptions::default(), &cancel).await;

        assert!(!report.is_success());
        assert_eq!(fake.delete_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_classification_deletes_nothing() {
        let ids: Vec<String> = (0..20).map(|n| format!("w{n}")).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let fake = Arc::new(
            FakeResourceApi::new("widget")
                .with_page(&ids)
                .with_describe_delay(Duration::from_millis(100)),
        );
        let api: Arc<dyn ResourceApi> = fake.clone();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            trigger.cancel();
        });

        let report = sweep_resources(api, "us-west-2", &SweepOptions::default(), &cancel).await;

        assert!(report.outcomes().is_empty());
        assert_eq!(report.not_attempted(), 20);
        assert_eq!(fake.delete_calls(), 0);
        assert!(!report.is_success());
        assert_eq!(
            report.render_failures(),
            "sweep of widget (us-west-2) cancelled: 20 resource(s) not attempted"
        );
    }

    struct FailingFactory;

    #[async_trait]
    impl ClientFactory<()> for FailingFactory {
        async fn create(&self, region: &str) -> Result<(), ClientError> {
            Err(ClientError::SetupFailed {
                region: region.to_string(),
                message: "no credentials".to_string(),
            })
        }
    }

    struct UnitFactory;

    #[async_trait]
    impl ClientFactory<()> for UnitFactory {
        async fn create(&self, _region: &str) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_regional_sweeper_surfaces_client_error() {
        let clients = Arc::new(RegionalClientCache::new(FailingFactory));
        let sweeper = RegionalSweeper::new("widget", clients, |_client| {
            Arc::new(FakeResourceApi::new("widget")) as Arc<dyn ResourceApi>
        });

        let err = sweeper
            .sweep("us-west-2", &RunContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SweepError::Client { .. }));
        assert!(err.to_string().starts_with("getting client for widget (us-west-2)"));
    }

    #[tokio::test]
    async fn test_regional_sweeper_runs_against_cached_client() {
        let clients = Arc::new(RegionalClientCache::new(UnitFactory));
        let sweeper = RegionalSweeper::new("widget", Arc::clone(&clients), |_client| {
            Arc::new(FakeResourceApi::new("widget").with_page(&["A"])) as Arc<dyn ResourceApi>
        });

        let report = sweeper
            .sweep("eu-west-1", &RunContext::default())
            .await
            .unwrap();

        assert_eq!(sweeper.name(), "widget");
        assert_eq!(report.region(), "eu-west-1");
        assert_eq!(report.outcome("A"), Some(&SweepOutcome::Succeeded));
        assert_eq!(clients.cached_regions(), vec!["eu-west-1"]);
    }

    #[tokio::test]
    async fn test_regional_sweeper_usable_as_shared_trait_object() {
        let clients = Arc::new(RegionalClientCache::new(UnitFactory));
        let regional = RegionalSweeper::new("widget", clients, |_client| {
            Arc::new(FakeResourceApi::new("widget").with_page(&["A", "B"])) as Arc<dyn ResourceApi>
        });
        let sweeper: Arc<dyn Sweeper> = Arc::new(regional);

        // Spawning requires the sweep future to be Send
        let task =
            tokio::spawn(async move { sweeper.sweep("us-west-2", &RunContext::default()).await });
        let report = task.await.unwrap().unwrap();

        assert_eq!(report.succeeded_count(), 2);
        assert!(report.is_success());
    }
}
