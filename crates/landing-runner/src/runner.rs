//! The stage/module scheduler.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use landing_core::ResolvedConfig;
use landing_credentials::{CredentialBroker, RoleAssumer, SeedCredentialSource};
use landing_retry::{BackoffPolicy, RetryingInvoker};
use tracing::{debug, error, info};

use crate::context::{ExecutionContext, RunParams, RunScope};
use crate::error::{ModuleError, RunnerError, RunnerResult};
use crate::plan::{ExecutionGroup, ExecutionPlan};
use crate::registry::ModuleRegistry;
use crate::shared::{ConventionalLogBucket, SharedResourceResolver, SharedResources};
use crate::skip::{NeverSkip, SkipPredicate};
use crate::state::RunState;
use crate::status;

/// Schedules the modules of an injected registry.
///
/// Groups run strictly in ascending run order. Every module of a group is
/// invoked concurrently and the whole group settles before the next one
/// starts. A rejected module fails the run once its group has settled unless
/// the run tolerates module failures.
pub struct ModuleRunner {
    registry: Arc<ModuleRegistry>,
    config: Arc<ResolvedConfig>,
    assumer: Arc<dyn RoleAssumer>,
    seed_source: Arc<dyn SeedCredentialSource>,
    skip: Arc<dyn SkipPredicate>,
    resolver: Arc<dyn SharedResourceResolver>,
    retry_policy: BackoffPolicy,
}

impl fmt::Debug for ModuleRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRunner")
            .field("stages", &self.registry.stages().len())
            .field("modules", &self.registry.module_count())
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ModuleRunner {
    /// Create a runner over `registry` with its collaborators.
    #[must_use]
    pub fn new(
        registry: ModuleRegistry,
        config: ResolvedConfig,
        assumer: Arc<dyn RoleAssumer>,
        seed_source: Arc<dyn SeedCredentialSource>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
            assumer,
            seed_source,
            skip: Arc::new(NeverSkip),
            resolver: Arc::new(ConventionalLogBucket),
            retry_policy: BackoffPolicy::default(),
        }
    }

    /// Suppress modules the predicate selects.
    #[must_use]
    pub fn with_skip_predicate(mut self, skip: impl SkipPredicate + 'static) -> Self {
        self.skip = Arc::new(skip);
        self
    }

    /// Use a different resolver for shared resources.
    #[must_use]
    pub fn with_shared_resolver(mut self, resolver: impl SharedResourceResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Use a different backoff policy for remote calls.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: BackoffPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// The registry this runner schedules.
    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Run one stage or the whole pipeline and return the status report.
    pub async fn execute(&self, params: RunParams) -> RunnerResult<String> {
        let mut state = RunState::Idle;
        info!(
            stage = params.stage.as_deref().unwrap_or("*"),
            phase = %params.phase,
            dry_run = params.dry_run,
            "starting run"
        );

        let plan = ExecutionPlan::resolve(&self.registry, params.stage.as_deref(), params.phase)?;
        state.transition(RunState::PlanResolved)?;
        debug!(modules = plan.module_count(), "plan resolved");

        let groups = match plan {
            ExecutionPlan::NoModules(stage) => {
                info!(stage = %stage, "no modules to run");
                state.transition(RunState::Complete)?;
                return Ok(status::no_modules(&stage));
            }
            ExecutionPlan::Groups(groups) => groups,
        };

        let seed = self.seed_source.load().await?;
        let invoker = RetryingInvoker::new(self.retry_policy);
        let broker = CredentialBroker::new(
            Arc::clone(&self.assumer),
            invoker,
            self.config.management_account_id().clone(),
        );
        let tolerate = params.tolerate_module_failures;
        let scope = Arc::new(RunScope::new(
            params,
            Arc::clone(&self.config),
            seed,
            broker,
            invoker,
            SharedResources::new(Arc::clone(&self.resolver)),
        ));

        let mut report = Vec::new();
        for (index, group) in groups.iter().enumerate() {
            state.transition(RunState::GroupExecuting(index))?;
            if let Err(e) = self.run_group(&scope, group, tolerate, &mut report).await {
                state.transition(RunState::Failed)?;
                return Err(e);
            }
        }

        state.transition(RunState::Complete)?;
        info!(groups = groups.len(), lines = report.len(), "run complete");
        Ok(report.join("\n"))
    }

    async fn run_group(
        &self,
        scope: &Arc<RunScope>,
        group: &ExecutionGroup,
        tolerate: bool,
        report: &mut Vec<String>,
    ) -> RunnerResult<()> {
        let runnable: Vec<_> = group
            .modules
            .iter()
            .filter(|planned| {
                let skip = self.skip.should_skip(planned.module.name());
                if skip {
                    info!(module = planned.module.name(), "module disabled by environment");
                }
                !skip
            })
            .collect();
        info!(run_order = group.run_order, modules = runnable.len(), "executing group");

        let results = join_all(runnable.iter().map(|planned| {
            let ctx = Arc::new(ExecutionContext::new(
                Arc::clone(scope),
                planned.stage.as_str(),
                planned.module.name(),
            ));
            async move {
                debug!(module = planned.module.name(), stage = %planned.stage, "invoking module");
                planned.module.handler().handle(ctx).await
            }
        }))
        .await;

        let mut first_failure: Option<RunnerError> = None;
        for (planned, result) in runnable.iter().zip(results) {
            let module = planned.module.name();
            match result {
                Ok(line) => {
                    info!(module, "module finished");
                    report.push(line);
                }
                Err(e) if tolerate => {
                    error!(module, stage = %planned.stage, error = %e, "module failed, continuing");
                    report.push(status::failed(module, &e));
                }
                Err(e) => {
                    error!(module, stage = %planned.stage, error = %e, "module failed");
                    first_failure.get_or_insert(failure(&planned.stage, module, e));
                }
            }
        }

        first_failure.map_or(Ok(()), Err)
    }
}

fn failure(stage: &str, module: &str, source: ModuleError) -> RunnerError {
    RunnerError::ModuleFailed {
        stage: stage.to_owned(),
        module: module.to_owned(),
        source,
    }
}
