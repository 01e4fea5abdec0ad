use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use landing_core::{Credentials, ExecutionPhase, ResolvedConfig};
use landing_credentials::{AssumeRoleError, CredentialRequest, RoleAssumer, StaticSeed};
use landing_retry::{BackoffPolicy, RemoteError};
use landing_runner::{
    ModuleDefinition, ModuleHandler, ModuleRegistry, ModuleRunner, StageDefinition,
};

/// Assumes roles everywhere except in the listed accounts.
///
/// Denied accounts report the role as not assumable, or fail with
/// `error_code` when one is set.
#[derive(Debug)]
pub(crate) struct SelectiveAssumer {
    denied: HashSet<String>,
    error_code: Option<&'static str>,
}

#[async_trait]
impl RoleAssumer for SelectiveAssumer {
    async fn assume_role(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<Credentials, AssumeRoleError> {
        if self.denied.contains(request.account_id.as_str()) {
            if let Some(code) = self.error_code {
                return Err(AssumeRoleError::Remote(RemoteError::with_code(code, "request failed")));
            }
            return Err(AssumeRoleError::NotAssumable {
                role_arn: format!("arn:aws:iam::{}:role/{}", request.account_id, request.role_name),
                message: "AccessDenied".to_owned(),
            });
        }
        Ok(Credentials::new(format!("ASIA{}", request.account_id), "secret", None, None))
    }
}

pub(crate) fn config(central_logging: bool) -> ResolvedConfig {
    serde_json::from_value(serde_json::json!({
        "accounts": {
            "managementAccount": { "name": "Management", "id": "111111111111" },
            "memberAccounts": [
                { "name": "LogArchive", "id": "222222222222" },
                { "name": "Audit", "id": "333333333333" },
                { "name": "Retired", "id": "444444444444", "suspended": true }
            ]
        },
        "global": {
            "homeRegion": "us-east-1",
            "enabledRegions": ["us-east-1", "eu-west-1"],
            "managementAccountAccessRole": "AWSControlTowerExecution",
            "centralLogging": { "enabled": central_logging, "logArchiveAccount": "LogArchive" }
        }
    }))
    .unwrap()
}

pub(crate) fn single_module(
    stage: &str,
    name: &str,
    handler: impl ModuleHandler + 'static,
) -> ModuleRegistry {
    ModuleRegistry::default().with_stage(StageDefinition::new(stage, 1).with_module(
        ModuleDefinition::new(name, 1, ExecutionPhase::Deploy, Arc::new(handler)),
    ))
}

pub(crate) fn runner_with(
    registry: ModuleRegistry,
    config: ResolvedConfig,
    denied: &[&str],
) -> ModuleRunner {
    runner_failing_with(registry, config, denied, None)
}

/// Like [`runner_with`], but denied accounts fail with `error_code`.
pub(crate) fn runner_failing_with(
    registry: ModuleRegistry,
    config: ResolvedConfig,
    denied: &[&str],
    error_code: Option<&'static str>,
) -> ModuleRunner {
    let assumer = SelectiveAssumer {
        denied: denied.iter().map(|s| (*s).to_owned()).collect(),
        error_code,
    };
    ModuleRunner::new(
        registry,
        config,
        Arc::new(assumer),
        Arc::new(StaticSeed::new(Credentials::new("AKIAROOT", "root", None, None))),
    )
    .with_retry_policy(BackoffPolicy::new(
        3,
        Duration::from_millis(10),
        Duration::from_millis(20),
    ))
}
