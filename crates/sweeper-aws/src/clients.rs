//! One shared AWS configuration per region.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use sweeper_core::{ClientError, ClientFactory};
use tracing::debug;

/// Regional AWS client: one loaded [`SdkConfig`] from which every service
/// client is derived.
#[derive(Debug, Clone)]
pub struct AwsClients {
    config: SdkConfig,
}

impl AwsClients {
    pub fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn kms(&self) -> aws_sdk_kms::Client {
        aws_sdk_kms::Client::new(&self.config)
    }

    pub fn apigateway(&self) -> aws_sdk_apigateway::Client {
        aws_sdk_apigateway::Client::new(&self.config)
    }
}

/// Loads the default credential chain for a region and checks that it
/// actually yields credentials before the client is cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsClientFactory;

#[async_trait]
impl ClientFactory<AwsClients> for AwsClientFactory {
    async fn create(&self, region: &str) -> Result<AwsClients, ClientError> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        let provider = config
            .credentials_provider()
            .ok_or_else(|| ClientError::SetupFailed {
                region: region.to_string(),
                message: "no credentials provider configured".to_string(),
            })?;

        provider
            .provide_credentials()
            .await
            .map_err(|e| ClientError::SetupFailed {
                region: region.to_string(),
                message: format!("loading credentials: {}", e),
            })?;

        debug!(event = "aws.clients.config_loaded", region = region);
        Ok(AwsClients::new(config))
    }
}
