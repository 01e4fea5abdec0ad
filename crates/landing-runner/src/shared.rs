//! Shared resources resolved lazily once per run.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use landing_core::{CoreError, ResolvedConfig};
use tokio::sync::OnceCell;
use tracing::info;

use crate::context::RunParams;
use crate::error::ModuleError;

/// Resolves expensive resources several modules depend on.
#[async_trait]
pub trait SharedResourceResolver: Send + Sync {
    /// Name of the central log bucket.
    async fn central_log_bucket(
        &self,
        params: &RunParams,
        config: &ResolvedConfig,
    ) -> Result<String, ModuleError>;
}

/// Derives the central log bucket from configuration.
///
/// An imported bucket name wins; otherwise the bucket is
/// `<prefix>-central-logs-<log archive account>-<home region>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalLogBucket;

#[async_trait]
impl SharedResourceResolver for ConventionalLogBucket {
    async fn central_log_bucket(
        &self,
        params: &RunParams,
        config: &ResolvedConfig,
    ) -> Result<String, ModuleError> {
        let logging = config
            .global
            .central_logging
            .as_ref()
            .filter(|logging| logging.enabled)
            .ok_or_else(|| CoreError::Config("central logging is not enabled".to_owned()))?;

        if let Some(bucket) = &logging.imported_bucket_name {
            return Ok(bucket.clone());
        }

        let account = config
            .accounts
            .account_id(&logging.log_archive_account)
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "unknown log archive account: {}",
                    logging.log_archive_account
                ))
            })?;
        Ok(format!(
            "{}-central-logs-{account}-{}",
            params.resource_prefix, config.global.home_region
        ))
    }
}

/// Per-run cache of shared resources.
pub struct SharedResources {
    resolver: Arc<dyn SharedResourceResolver>,
    central_log_bucket: OnceCell<String>,
}

impl fmt::Debug for SharedResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedResources")
            .field("central_log_bucket", &self.central_log_bucket.get())
            .finish_non_exhaustive()
    }
}

impl SharedResources {
    /// Create an empty cache backed by `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<dyn SharedResourceResolver>) -> Self {
        Self {
            resolver,
            central_log_bucket: OnceCell::new(),
        }
    }

    /// The central log bucket, resolved on first call and cached afterwards.
    ///
    /// Concurrent first callers wait for a single resolution. A failed
    /// resolution is not cached.
    pub async fn central_log_bucket(
        &self,
        params: &RunParams,
        config: &ResolvedConfig,
    ) -> Result<String, ModuleError> {
        self.central_log_bucket
            .get_or_try_init(|| async {
                let bucket = self.resolver.central_log_bucket(params, config).await?;
                info!(bucket = %bucket, "resolved central log bucket");
                Ok::<_, ModuleError>(bucket)
            })
            .await
            .cloned()
    }
}
