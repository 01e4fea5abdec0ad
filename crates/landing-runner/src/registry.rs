//! The immutable stage registry injected into the runner.

use crate::module::ModuleDefinition;

/// A named pipeline stage. Stages sharing a run order execute together.
#[derive(Debug, Clone)]
pub struct StageDefinition {
    name: String,
    run_order: i32,
    modules: Vec<ModuleDefinition>,
}

impl StageDefinition {
    /// Create an empty stage.
    #[must_use]
    pub fn new(name: impl Into<String>, run_order: i32) -> Self {
        Self {
            name: name.into(),
            run_order,
            modules: Vec::new(),
        }
    }

    /// Add a module to the stage.
    #[must_use]
    pub fn with_module(mut self, module: ModuleDefinition) -> Self {
        self.modules.push(module);
        self
    }

    /// Stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run order relative to other stages.
    #[must_use]
    pub fn run_order(&self) -> i32 {
        self.run_order
    }

    /// Modules in registration order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleDefinition] {
        &self.modules
    }
}

/// Every stage the runner knows about.
///
/// Built once before any run and never mutated afterwards; the runner keeps
/// it behind an `Arc`. Duplicate stage names are accepted here and rejected
/// when a plan is resolved.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    stages: Vec<StageDefinition>,
}

impl ModuleRegistry {
    /// Create a registry from stages.
    #[must_use]
    pub fn new(stages: Vec<StageDefinition>) -> Self {
        Self { stages }
    }

    /// Add a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: StageDefinition) -> Self {
        self.stages.push(stage);
        self
    }

    /// All stages in registration order.
    #[must_use]
    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }

    /// Stages registered under `name`.
    pub fn stages_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a StageDefinition> {
        self.stages.iter().filter(move |stage| stage.name == name)
    }

    /// Total number of modules across all stages.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.modules.len()).sum()
    }
}
