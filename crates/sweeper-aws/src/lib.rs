//! AWS sweepers.
//!
//! Each resource type is a [`ResourceApi`](sweeper_core::ResourceApi) built on
//! the regional [`AwsClients`]; [`register_sweepers`] wires them all into a
//! registry sharing one client cache.

pub mod apigateway;
pub mod clients;
pub mod errors;
pub mod kms;

use std::sync::Arc;

use sweeper_config::SweeperConfig;
use sweeper_core::{
    RegionalClientCache, RegionalSweeper, RegistryError, ResourceApi, SweeperRegistry,
};

pub use clients::{AwsClientFactory, AwsClients};

/// Register every AWS sweeper against the shared regional `clients`.
pub fn register_sweepers(
    registry: &mut SweeperRegistry,
    clients: &Arc<RegionalClientCache<AwsClients>>,
    config: &SweeperConfig,
) -> Result<(), RegistryError> {
    let deletion_window = config.kms.deletion_window_in_days;
    registry.register(RegionalSweeper::new(
        kms::RESOURCE_TYPE,
        Arc::clone(clients),
        move |aws: Arc<AwsClients>| {
            Arc::new(kms::KmsKeys::new(aws.kms(), deletion_window)) as Arc<dyn ResourceApi>
        },
    ))?;

    registry.register(RegionalSweeper::new(
        apigateway::RESOURCE_TYPE,
        Arc::clone(clients),
        |aws: Arc<AwsClients>| {
            Arc::new(apigateway::VpcLinks::new(aws.apigateway())) as Arc<dyn ResourceApi>
        },
    ))?;

    Ok(())
}

/// Registry with every AWS sweeper, backed by the default credential chain.
pub fn default_registry(config: &SweeperConfig) -> Result<SweeperRegistry, RegistryError> {
    let clients = Arc::new(RegionalClientCache::new(AwsClientFactory));
    let mut registry = SweeperRegistry::new();
    register_sweepers(&mut registry, &clients, config)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_every_resource_type() {
        let registry = default_registry(&SweeperConfig::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec!["aws_api_gateway_vpc_link", "aws_kms_key"]
        );
    }

    #[test]
    fn test_registering_twice_is_rejected() {
        let clients = Arc::new(RegionalClientCache::new(AwsClientFactory));
        let mut registry = SweeperRegistry::new();
        register_sweepers(&mut registry, &clients, &SweeperConfig::default()).unwrap();

        let err =
            register_sweepers(&mut registry, &clients, &SweeperConfig::default()).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { .. }));
    }
}
