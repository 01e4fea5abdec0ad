//! Stage and module scheduling for the landing zone.
//!
//! A [`ModuleRegistry`] of stages is built once and injected into a
//! [`ModuleRunner`]. Each [`ModuleRunner::execute`] call resolves an
//! [`ExecutionPlan`], creates the run's credential broker and shared resource
//! cache, and runs the plan's groups in ascending run order with the modules
//! of each group running concurrently. Handlers receive an
//! [`ExecutionContext`] and answer with a status line.
//!
//! # Modules
//!
//! - [`context`] - Run parameters and the per-module context
//! - [`module`] - Module definitions and the handler seam
//! - [`plan`] - Plan resolution and grouping
//! - [`registry`] - Stages and the registry
//! - [`runner`] - The scheduler
//! - [`shared`] - Lazily resolved shared resources
//! - [`skip`] - Environment-driven module suppression
//! - [`state`] - Run lifecycle state machine
//! - [`status`] - Status line formats

pub mod context;
pub mod error;
pub mod module;
pub mod plan;
pub mod registry;
pub mod runner;
pub mod shared;
pub mod skip;
pub mod state;
pub mod status;

pub use context::{ExecutionContext, RunParams, RunScope};
pub use error::{ModuleError, RunnerError, RunnerResult};
pub use module::{ModuleDefinition, ModuleHandler, handler_fn};
pub use plan::{ExecutionGroup, ExecutionPlan, PlannedModule};
pub use registry::{ModuleRegistry, StageDefinition};
pub use runner::ModuleRunner;
pub use shared::{ConventionalLogBucket, SharedResourceResolver, SharedResources};
pub use skip::{EnvSkipPredicate, NeverSkip, SKIPPED_MODULES_VAR, SkipPredicate};
pub use state::RunState;
