//! Resolves the central log bucket for the log archive account.

use std::sync::Arc;

use async_trait::async_trait;
use landing_core::{CoreError, Target};
use landing_runner::{ExecutionContext, ModuleError, ModuleHandler, status};
use tracing::info;

/// Module name.
pub const NAME: &str = "resolve-central-log-target";

/// Resolves the run's shared central log bucket and confirms the log archive
/// account can be reached in the home region.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentralLogTargetModule;

#[async_trait]
impl ModuleHandler for CentralLogTargetModule {
    async fn handle(&self, ctx: Arc<ExecutionContext>) -> Result<String, ModuleError> {
        let config = ctx.config();
        let Some(logging) = config.global.central_logging.as_ref().filter(|l| l.enabled) else {
            return Ok(status::skipped(ctx.module_name(), "central logging is not enabled"));
        };

        let account = config
            .accounts
            .account_id(&logging.log_archive_account)
            .cloned()
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "unknown log archive account: {}",
                    logging.log_archive_account
                ))
            })?;
        let target = Target::new(account, config.global.home_region.clone());
        ctx.require_credentials(&target).await?;

        let bucket = ctx.central_log_bucket().await?;
        info!(module = NAME, target = %target, bucket = %bucket, "central log target resolved");
        Ok(status::completed(
            ctx.module_name(),
            format!("{target}: central log bucket {bucket}"),
        ))
    }
}
