//! Run parameters and the context handed to module handlers.

use std::sync::Arc;

use landing_core::{
    AccountId, Credentials, ExecutionPhase, LandingConfig, Partition, ResolvedConfig, Target,
};
use landing_credentials::{CredentialBroker, CredentialError, CredentialRequest};
use landing_fanout::FanOutExecutor;
use landing_retry::RetryingInvoker;
use typed_builder::TypedBuilder;

use crate::error::ModuleError;
use crate::shared::SharedResources;

/// Parameters of one run.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct RunParams {
    /// Stage to run; `None` runs the whole pipeline.
    #[builder(default, setter(into, strip_option))]
    pub stage: Option<String>,
    /// Phase used to filter the modules of a single stage.
    #[builder(default)]
    pub phase: ExecutionPhase,
    /// AWS partition.
    #[builder(default)]
    pub partition: Partition,
    /// Report what would change without changing it.
    #[builder(default = false)]
    pub dry_run: bool,
    /// Maximum per-target actions a module runs at once.
    #[builder(default = 10)]
    pub max_concurrency: usize,
    /// Solution identifier attached to remote calls.
    #[builder(default = String::from("SO0199"), setter(into))]
    pub solution_id: String,
    /// Prefix for resources created by the landing zone.
    #[builder(default = String::from("landing-zone"), setter(into))]
    pub resource_prefix: String,
    /// Record failed modules and keep scheduling instead of stopping the run.
    #[builder(default = false)]
    pub tolerate_module_failures: bool,
}

impl RunParams {
    /// Derive run parameters from the runtime configuration.
    #[must_use]
    pub fn from_config(config: &LandingConfig) -> Self {
        Self {
            stage: config.stage.clone(),
            phase: config.phase,
            partition: config.partition,
            dry_run: config.dry_run,
            max_concurrency: config.max_concurrency,
            solution_id: config.solution_id.clone(),
            resource_prefix: config.resource_prefix.clone(),
            tolerate_module_failures: config.tolerate_module_failures,
        }
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Everything created once per run and shared by all of its modules.
#[derive(Debug)]
pub struct RunScope {
    params: RunParams,
    config: Arc<ResolvedConfig>,
    seed: Credentials,
    broker: CredentialBroker,
    invoker: RetryingInvoker,
    resources: SharedResources,
}

impl RunScope {
    /// Bundle the per-run state.
    #[must_use]
    pub fn new(
        params: RunParams,
        config: Arc<ResolvedConfig>,
        seed: Credentials,
        broker: CredentialBroker,
        invoker: RetryingInvoker,
        resources: SharedResources,
    ) -> Self {
        Self {
            params,
            config,
            seed,
            broker,
            invoker,
            resources,
        }
    }
}

/// Immutable view of a run handed to one module invocation.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    stage_name: String,
    module_name: String,
    scope: Arc<RunScope>,
}

impl ExecutionContext {
    /// Create the context for one module of a run.
    #[must_use]
    pub fn new(
        scope: Arc<RunScope>,
        stage_name: impl Into<String>,
        module_name: impl Into<String>,
    ) -> Self {
        Self {
            stage_name: stage_name.into(),
            module_name: module_name.into(),
            scope,
        }
    }

    /// Name of the module being run.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Name of the module's stage.
    #[must_use]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Run parameters.
    #[must_use]
    pub fn params(&self) -> &RunParams {
        &self.scope.params
    }

    /// Resolved landing zone configuration.
    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.scope.config
    }

    /// Retry wrapper for the module's own remote calls.
    #[must_use]
    pub fn invoker(&self) -> &RetryingInvoker {
        &self.scope.invoker
    }

    /// ID of the management account.
    #[must_use]
    pub fn management_account_id(&self) -> &AccountId {
        self.scope.config.management_account_id()
    }

    /// A fan-out executor bounded by the run's concurrency cap.
    #[must_use]
    pub fn fan_out(&self) -> FanOutExecutor {
        FanOutExecutor::new(self.scope.params.max_concurrency)
    }

    /// Credentials for `target` through the management access role.
    ///
    /// `Ok(None)` means the role cannot be assumed there. Requests for the
    /// management account are answered with the seed credentials, which the
    /// broker checks for expiry first.
    pub async fn credentials_for(
        &self,
        target: &Target,
    ) -> Result<Option<Credentials>, CredentialError> {
        self.scope
            .broker
            .get_credentials(CredentialRequest {
                account_id: &target.account_id,
                region: &target.region,
                role_name: &self.scope.config.global.management_account_access_role,
                seed: &self.scope.seed,
            })
            .await
    }

    /// Credentials for `target`, failing if the role cannot be assumed.
    pub async fn require_credentials(&self, target: &Target) -> Result<Credentials, ModuleError> {
        self.credentials_for(target)
            .await?
            .ok_or_else(|| ModuleError::MissingCredentials {
                account_id: target.account_id.clone(),
                region: target.region.clone(),
            })
    }

    /// The central log bucket, resolved at most once per run.
    pub async fn central_log_bucket(&self) -> Result<String, ModuleError> {
        self.scope
            .resources
            .central_log_bucket(&self.scope.params, &self.scope.config)
            .await
    }
}
