//! Verifies the management access role can be assumed everywhere.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use landing_fanout::TargetCheck;
use landing_runner::{ExecutionContext, ModuleError, ModuleHandler, status};
use tracing::info;

/// Module name.
pub const NAME: &str = "validate-management-access";

/// Fails the stage when any active account cannot be reached in any enabled
/// region through the management access role.
///
/// Every target is checked before failing so the error lists all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessCheckModule;

#[async_trait]
impl ModuleHandler for AccessCheckModule {
    async fn handle(&self, ctx: Arc<ExecutionContext>) -> Result<String, ModuleError> {
        let targets = ctx.config().target_matrix().build();
        let role = ctx.config().global.management_account_access_role.clone();
        info!(
            module = NAME,
            stage = ctx.stage_name(),
            targets = targets.len(),
            role = %role,
            "checking management access"
        );

        let report = ctx
            .fan_out()
            .run_checked(targets, |target| {
                let ctx = Arc::clone(&ctx);
                let role = role.clone();
                async move {
                    let check = match ctx.credentials_for(&target).await {
                        Ok(Some(_)) => TargetCheck::Passed(format!("role {role} is assumable")),
                        Ok(None) => TargetCheck::Failed(format!("role {role} cannot be assumed")),
                        Err(e) => TargetCheck::Failed(e.to_string()),
                    };
                    Ok::<_, Infallible>(check)
                }
            })
            .await?;

        Ok(status::completed(ctx.module_name(), report))
    }
}
