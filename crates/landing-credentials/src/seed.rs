//! Sources of the management account's seed credentials.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use chrono::{DateTime, Utc};
use landing_core::{AwsRegion, Credentials};
use tracing::debug;

use crate::error::CredentialError;

/// Supplies the credentials every delegation chain starts from.
#[async_trait]
pub trait SeedCredentialSource: Send + Sync {
    /// Load the seed credentials for the management account.
    async fn load(&self) -> Result<Credentials, CredentialError>;
}

/// A fixed set of seed credentials.
#[derive(Debug, Clone)]
pub struct StaticSeed(Credentials);

impl StaticSeed {
    /// Wrap already known credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self(credentials)
    }
}

#[async_trait]
impl SeedCredentialSource for StaticSeed {
    async fn load(&self) -> Result<Credentials, CredentialError> {
        Ok(self.0.clone())
    }
}

/// Seed credentials resolved through the standard AWS provider chain
/// (environment, profile, web identity, container and instance metadata).
#[derive(Debug, Clone)]
pub struct DefaultChainSeed {
    region: AwsRegion,
}

impl DefaultChainSeed {
    /// Resolve credentials using `region` for any regional provider lookups.
    #[must_use]
    pub fn new(region: AwsRegion) -> Self {
        Self { region }
    }
}

#[async_trait]
impl SeedCredentialSource for DefaultChainSeed {
    async fn load(&self) -> Result<Credentials, CredentialError> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.as_str().to_owned()))
            .load()
            .await;
        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| CredentialError::Seed("no credentials provider configured".to_owned()))?;
        let creds = provider
            .provide_credentials()
            .await
            .map_err(|e| CredentialError::Seed(e.to_string()))?;

        debug!(region = %self.region, "loaded seed credentials from default provider chain");
        Ok(Credentials::new(
            creds.access_key_id(),
            creds.secret_access_key(),
            creds.session_token().map(ToOwned::to_owned),
            creds.expiry().map(DateTime::<Utc>::from),
        ))
    }
}
