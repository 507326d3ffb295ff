use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::SweepError;

/// Why a candidate was left alone. Never a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Owned by the platform, not by a test run.
    ManagedExternally,
    PendingDeletion,
    AccessDenied,
    /// Vanished between listing and describing.
    NotFound,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ManagedExternally => "managed externally",
            SkipReason::PendingDeletion => "pending deletion",
            SkipReason::AccessDenied => "access denied",
            SkipReason::NotFound => "not found",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal state of one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SweepOutcome {
    Succeeded,
    Skipped(SkipReason),
    Failed(String),
}

impl SweepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SweepOutcome::Failed(_))
    }
}

/// Where in the sweep a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    List,
    Describe,
    Delete,
    Cancelled,
}

/// One structured failure. A report keeps every one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub resource_type: String,
    pub identifier: Option<String>,
    pub stage: FailureStage,
    pub cause: String,
}

impl FailureRecord {
    /// One-line message, e.g. `sweeping aws_kms_key (abc): DeleteKey: throttled`.
    pub fn render(&self, region: &str) -> String {
        let subject = self.identifier.as_deref().unwrap_or(region);
        let (kind, cause) = (&self.resource_type, &self.cause);
        match self.stage {
            FailureStage::List => format!("listing {kind} ({subject}): {cause}"),
            FailureStage::Describe => format!("reading {kind} ({subject}): {cause}"),
            FailureStage::Delete => format!("sweeping {kind} ({subject}): {cause}"),
            FailureStage::Cancelled => format!("sweep of {kind} ({region}) cancelled: {cause}"),
        }
    }
}

/// Diagnostic log entry, kept in the order outcomes were recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeEntry {
    pub resource_type: String,
    pub identifier: String,
    pub outcome: SweepOutcome,
}

/// Aggregate result of one sweep of one resource type in one region.
///
/// The content that matters is the identifier → outcome mapping; `log` only
/// exists for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    resource_type: String,
    region: String,
    started_at: DateTime<Utc>,
    outcomes: BTreeMap<String, SweepOutcome>,
    log: Vec<OutcomeEntry>,
    failures: Vec<FailureRecord>,
    region_skipped: Option<String>,
    not_attempted: usize,
}

impl SweepReport {
    pub fn new(resource_type: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            region: region.into(),
            started_at: Utc::now(),
            outcomes: BTreeMap::new(),
            log: Vec::new(),
            failures: Vec::new(),
            region_skipped: None,
            not_attempted: 0,
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn outcome(&self, identifier: &str) -> Option<&SweepOutcome> {
        self.outcomes.get(identifier)
    }

    pub fn outcomes(&self) -> &BTreeMap<String, SweepOutcome> {
        &self.outcomes
    }

    pub fn log(&self) -> &[OutcomeEntry] {
        &self.log
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Reason the whole region was skipped (service unavailable there), if it was.
    pub fn region_skipped(&self) -> Option<&str> {
        self.region_skipped.as_deref()
    }

    /// Sweepables dropped unattempted because the run was cancelled.
    pub fn not_attempted(&self) -> usize {
        self.not_attempted
    }

    pub fn succeeded_count(&self) -> usize {
        self.count(|o| matches!(o, SweepOutcome::Succeeded))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, SweepOutcome::Skipped(_)))
    }

    pub fn failed_count(&self) -> usize {
        self.count(SweepOutcome::is_failed)
    }

    /// No failures of any stage. Skips never affect this.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every failure, one per line.
    pub fn render_failures(&self) -> String {
        self.failures
            .iter()
            .map(|f| f.render(&self.region))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The combined error for this report, if it failed.
    pub fn error(&self) -> Option<SweepError> {
        if self.is_success() {
            return None;
        }
        Some(SweepError::Failed {
            resource_type: self.resource_type.clone(),
            region: self.region.clone(),
            count: self.failures.len(),
            details: self.render_failures(),
        })
    }

    pub fn into_result(self) -> Result<SweepReport, SweepError> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    pub(crate) fn record_success(&mut self, resource_type: &str, identifier: &str) {
        self.record(resource_type, identifier, SweepOutcome::Succeeded);
    }

    pub(crate) fn record_skip(
        &mut self,
        resource_type: &str,
        identifier: &str,
        reason: SkipReason,
    ) {
        self.record(resource_type, identifier, SweepOutcome::Skipped(reason));
    }

    /// Record a failed describe or delete for one identifier.
    pub(crate) fn record_failure(
        &mut self,
        resource_type: &str,
        identifier: &str,
        stage: FailureStage,
        cause: String,
    ) {
        self.record(resource_type, identifier, SweepOutcome::Failed(cause.clone()));
        self.failures.push(FailureRecord {
            resource_type: resource_type.to_string(),
            identifier: Some(identifier.to_string()),
            stage,
            cause,
        });
    }

    pub(crate) fn record_enumeration_error(&mut self, cause: String) {
        self.failures.push(FailureRecord {
            resource_type: self.resource_type.clone(),
            identifier: None,
            stage: FailureStage::List,
            cause,
        });
    }

    pub(crate) fn mark_region_skipped(&mut self, reason: String) {
        self.region_skipped = Some(reason);
    }

    pub(crate) fn mark_cancelled(&mut self, not_attempted: usize) {
        self.not_attempted += not_attempted;
        let cause = format!("{} resource(s) not attempted", self.not_attempted);
        match self
            .failures
            .iter_mut()
            .find(|f| f.stage == FailureStage::Cancelled)
        {
            Some(existing) => existing.cause = cause,
            None => self.failures.push(FailureRecord {
                resource_type: self.resource_type.clone(),
                identifier: None,
                stage: FailureStage::Cancelled,
                cause,
            }),
        }
    }

    /// Fold another report (e.g. the orchestrator's) into this one.
    pub fn merge(&mut self, other: SweepReport) {
        for entry in other.log {
            self.record(&entry.resource_type, &entry.identifier, entry.outcome);
        }
        let cancelled = other
            .failures
            .iter()
            .any(|f| f.stage == FailureStage::Cancelled);
        self.failures.extend(
            other
                .failures
                .into_iter()
                .filter(|f| f.stage != FailureStage::Cancelled),
        );
        if cancelled || other.not_attempted > 0 {
            self.mark_cancelled(other.not_attempted);
        }
        if self.region_skipped.is_none() {
            self.region_skipped = other.region_skipped;
        }
    }

    fn record(&mut self, resource_type: &str, identifier: &str, outcome: SweepOutcome) {
        self.outcomes.insert(identifier.to_string(), outcome.clone());
        self.log.push(OutcomeEntry {
            resource_type: resource_type.to_string(),
            identifier: identifier.to_string(),
            outcome,
        });
    }

    fn count(&self, predicate: impl Fn(&SweepOutcome) -> bool) -> usize {
        self.outcomes.values().filter(|o| predicate(o)).count()
    }
}
