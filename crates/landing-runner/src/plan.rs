//! Execution plan resolution.
//!
//! A plan is a list of groups executed strictly in order. Modules inside a
//! group run concurrently; their order in the group only makes enumeration
//! and reporting deterministic.

use std::collections::{BTreeMap, HashSet};

use landing_core::ExecutionPhase;

use crate::error::{RunnerError, RunnerResult};
use crate::module::ModuleDefinition;
use crate::registry::{ModuleRegistry, StageDefinition};

/// A module scheduled as part of a group.
#[derive(Debug, Clone)]
pub struct PlannedModule {
    /// Stage the module belongs to.
    pub stage: String,
    /// The module itself.
    pub module: ModuleDefinition,
}

/// Modules that run together.
#[derive(Debug, Clone)]
pub struct ExecutionGroup {
    /// Run order shared by the group's stages.
    pub run_order: i32,
    /// Modules sorted by their own run order.
    pub modules: Vec<PlannedModule>,
}

/// What a run will execute.
#[derive(Debug, Clone)]
pub enum ExecutionPlan {
    /// The requested stage has no modules to run.
    NoModules(String),
    /// Groups to run in ascending run order.
    Groups(Vec<ExecutionGroup>),
}

impl ExecutionPlan {
    /// Resolve the plan for one stage or, with `stage = None`, the whole pipeline.
    ///
    /// A single stage runs as one group containing only modules of `phase`.
    /// The whole pipeline groups stages by run order and runs every module
    /// regardless of phase.
    pub fn resolve(
        registry: &ModuleRegistry,
        stage: Option<&str>,
        phase: ExecutionPhase,
    ) -> RunnerResult<Self> {
        match stage {
            Some(name) => Self::resolve_stage(registry, name, phase),
            None => Self::resolve_pipeline(registry),
        }
    }

    fn resolve_stage(
        registry: &ModuleRegistry,
        name: &str,
        phase: ExecutionPhase,
    ) -> RunnerResult<Self> {
        let matching: Vec<&StageDefinition> = registry.stages_named(name).collect();
        if matching.len() > 1 {
            return Err(RunnerError::DuplicateStage(name.to_owned()));
        }
        let Some(stage) = matching.first() else {
            return Ok(Self::NoModules(name.to_owned()));
        };

        let mut modules: Vec<PlannedModule> = stage
            .modules()
            .iter()
            .filter(|module| module.phase() == phase)
            .map(|module| PlannedModule {
                stage: stage.name().to_owned(),
                module: module.clone(),
            })
            .collect();
        if modules.is_empty() {
            return Ok(Self::NoModules(name.to_owned()));
        }
        modules.sort_by_key(|planned| planned.module.run_order());

        Ok(Self::Groups(vec![ExecutionGroup {
            run_order: stage.run_order(),
            modules,
        }]))
    }

    fn resolve_pipeline(registry: &ModuleRegistry) -> RunnerResult<Self> {
        let mut seen = HashSet::new();
        for stage in registry.stages() {
            if !seen.insert(stage.name()) {
                return Err(RunnerError::DuplicateStage(stage.name().to_owned()));
            }
        }

        let mut by_order: BTreeMap<i32, Vec<PlannedModule>> = BTreeMap::new();
        for stage in registry.stages() {
            let group = by_order.entry(stage.run_order()).or_default();
            group.extend(stage.modules().iter().map(|module| PlannedModule {
                stage: stage.name().to_owned(),
                module: module.clone(),
            }));
        }

        let groups = by_order
            .into_iter()
            .filter(|(_, modules)| !modules.is_empty())
            .map(|(run_order, mut modules)| {
                modules.sort_by_key(|planned| planned.module.run_order());
                ExecutionGroup { run_order, modules }
            })
            .collect();
        Ok(Self::Groups(groups))
    }

    /// Number of modules the plan will invoke, skips aside.
    #[must_use]
    pub fn module_count(&self) -> usize {
        match self {
            Self::NoModules(_) => 0,
            Self::Groups(groups) => groups.iter().map(|group| group.modules.len()).sum(),
        }
    }
}
