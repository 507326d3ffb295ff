//! Skip policy applied to every listed identifier.

use tracing::{debug, info};

use crate::api::{ApiError, Candidate, LifecycleState, ManagedBy, ResourceApi};

use super::report::SkipReason;

/// Result of running one identifier through the skip policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Proceed(Candidate),
    Skip(SkipReason),
    /// Describe failed for a reason that is neither "gone" nor "denied".
    Error(ApiError),
}

/// Describe `id` and decide whether it may be deleted.
pub async fn classify(api: &dyn ResourceApi, id: &str) -> Classification {
    let resource_type = api.resource_type();

    let candidate = match api.describe(id).await {
        Ok(candidate) => candidate,
        Err(e) if e.is_not_found() => {
            debug!(
                event = "core.sweep.candidate_skipped",
                resource_type = resource_type,
                identifier = id,
                reason = %SkipReason::NotFound
            );
            return Classification::Skip(SkipReason::NotFound);
        }
        Err(e) if e.is_access_denied() => {
            info!(
                event = "core.sweep.candidate_skipped",
                resource_type = resource_type,
                identifier = id,
                reason = %SkipReason::AccessDenied,
                error = %e
            );
            return Classification::Skip(SkipReason::AccessDenied);
        }
        Err(e) => return Classification::Error(e),
    };

    if let Some(reason) = skip_reason(&candidate) {
        debug!(
            event = "core.sweep.candidate_skipped",
            resource_type = resource_type,
            identifier = id,
            reason = %reason
        );
        return Classification::Skip(reason);
    }

    Classification::Proceed(candidate)
}

/// Skip predicates on an already described candidate.
pub fn skip_reason(candidate: &Candidate) -> Option<SkipReason> {
    if candidate.managed_by() == ManagedBy::Platform {
        return Some(SkipReason::ManagedExternally);
    }
    if *candidate.lifecycle() == LifecycleState::PendingDeletion {
        return Some(SkipReason::PendingDeletion);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeResourceApi;

    #[test]
    fn test_platform_managed_is_skipped() {
        let candidate = Candidate::new("k1").with_managed_by(ManagedBy::Platform);
        assert_eq!(skip_reason(&candidate), Some(SkipReason::ManagedExternally));
    }

    #[test]
    fn test_management_marker_wins_over_lifecycle() {
        let candidate = Candidate::new("k1")
            .with_managed_by(ManagedBy::Platform)
            .with_lifecycle(LifecycleState::PendingDeletion);
        assert_eq!(skip_reason(&candidate), Some(SkipReason::ManagedExternally));
    }

    #[test]
    fn test_pending_deletion_is_skipped() {
        let candidate = Candidate::new("k1").with_lifecycle(LifecycleState::PendingDeletion);
        assert_eq!(skip_reason(&candidate), Some(SkipReason::PendingDeletion));
    }

    #[test]
    fn test_other_lifecycle_states_proceed() {
        let candidate =
            Candidate::new("k1").with_lifecycle(LifecycleState::Other("Disabled".to_string()));
        assert_eq!(skip_reason(&candidate), None);
    }

    #[tokio::test]
    async fn test_classify_describe_outcomes() {
        let api = FakeResourceApi::new("widget")
            .with_describe("gone", Err(ApiError::not_found("DescribeWidget", "missing")))
            .with_describe(
                "denied",
                Err(ApiError::access_denied("DescribeWidget", "not authorized")),
            )
            .with_describe("broken", Err(ApiError::other("DescribeWidget", "internal")))
            .with_describe(
                "managed",
                Ok(Candidate::new("managed").with_managed_by(ManagedBy::Platform)),
            )
            .with_describe(
                "dying",
                Ok(Candidate::new("dying").with_lifecycle(LifecycleState::PendingDeletion)),
            );

        assert_eq!(
            classify(&api, "gone").await,
            Classification::Skip(SkipReason::NotFound)
        );
        assert_eq!(
            classify(&api, "denied").await,
            Classification::Skip(SkipReason::AccessDenied)
        );
        assert_eq!(
            classify(&api, "broken").await,
            Classification::Error(ApiError::other("DescribeWidget", "internal"))
        );
        assert_eq!(
            classify(&api, "managed").await,
            Classification::Skip(SkipReason::ManagedExternally)
        );
        assert_eq!(
            classify(&api, "dying").await,
            Classification::Skip(SkipReason::PendingDeletion)
        );
        assert_eq!(
            classify(&api, "fresh").await,
            Classification::Proceed(Candidate::new("fresh"))
        );
        assert_eq!(api.describe_calls(), 6);
    }
}
