//! Resource-type name → sweep entry point.
//!
//! Built once at startup and then only read. The invocation surface takes it
//! by reference.

mod errors;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::sweep::{RunContext, SweepError, SweepReport};

pub use errors::RegistryError;

/// Sweep entry point for one resource type.
#[async_trait]
pub trait Sweeper: Send + Sync {
    /// Resource-type name, e.g. `aws_kms_key`.
    fn name(&self) -> &str;

    /// Sweep `region`. Per-resource failures are carried in the report; only
    /// problems that prevent sweeping at all are returned as errors.
    async fn sweep(&self, region: &str, ctx: &RunContext) -> Result<SweepReport, SweepError>;
}

#[derive(Default)]
pub struct SweeperRegistry {
    sweepers: BTreeMap<String, Arc<dyn Sweeper>>,
}

impl SweeperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sweeper: impl Sweeper + 'static) -> Result<(), RegistryError> {
        let name = sweeper.name().to_string();
        if self.sweepers.contains_key(&name) {
            return Err(RegistryError::Duplicate { name });
        }
        debug!(event = "core.registry.sweeper_registered", name = %name);
        self.sweepers.insert(name, Arc::new(sweeper));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Sweeper>> {
        self.sweepers.get(name).map(Arc::clone)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.sweepers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.sweepers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweepers.is_empty()
    }

    /// Sweepers matching `filter`, in name order. An empty filter selects all.
    pub fn select(&self, filter: &[String]) -> Result<Vec<Arc<dyn Sweeper>>, RegistryError> {
        if filter.is_empty() {
            return Ok(self.sweepers.values().cloned().collect());
        }

        if let Some(unknown) = filter.iter().find(|name| !self.sweepers.contains_key(*name)) {
            return Err(RegistryError::UnknownSweeper {
                name: unknown.clone(),
                available: self.names().join(", "),
            });
        }

        Ok(self
            .sweepers
            .iter()
            .filter(|(name, _)| filter.contains(name))
            .map(|(_, sweeper)| Arc::clone(sweeper))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SweeperError;

    struct NamedSweeper(&'static str);

    #[async_trait]
    impl Sweeper for NamedSweeper {
        fn name(&self) -> &str {
            self.0
        }

        async fn sweep(&self, region: &str, _ctx: &RunContext) -> Result<SweepReport, SweepError> {
            Ok(SweepReport::new(self.0, region))
        }
    }

    fn registry() -> SweeperRegistry {
        let mut registry = SweeperRegistry::new();
        registry.register(NamedSweeper("aws_kms_key")).unwrap();
        registry.register(NamedSweeper("aws_api_gateway_vpc_link")).unwrap();
        registry
    }

    #[test]
    fn test_names_are_sorted() {
        assert_eq!(
            registry().names(),
            vec!["aws_api_gateway_vpc_link", "aws_kms_key"]
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let err = registry.register(NamedSweeper("aws_kms_key")).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { .. }));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_select_all_and_filtered() {
        let registry = registry();
        assert_eq!(registry.select(&[]).unwrap().len(), 2);

        let selected = registry.select(&["aws_kms_key".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name(), "aws_kms_key");
    }

    #[test]
    fn test_select_unknown_is_user_error() {
        let err = registry()
            .select(&["aws_s3_bucket".to_string()])
            .err()
            .unwrap();
        assert!(err.is_user_error());
        assert_eq!(
            err.to_string(),
            "Unknown sweeper 'aws_s3_bucket'. Available: aws_api_gateway_vpc_link, aws_kms_key"
        );
    }

    #[tokio::test]
    async fn test_get_returns_entry_point() {
        let sweeper = registry().get("aws_kms_key").unwrap();
        let report = sweeper
            .sweep("us-west-2", &RunContext::default())
            .await
            .unwrap();
        assert_eq!(report.resource_type(), "aws_kms_key");
        assert!(registry().get("missing").is_none());
    }
}
