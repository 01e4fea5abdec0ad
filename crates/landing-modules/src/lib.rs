//! Built-in landing zone modules.
//!
//! [`default_registry`] assembles the stages the runner binary schedules:
//!
//! | Stage | Run order | Module | Phase |
//! |-------|-----------|--------|-------|
//! | `prepare` | 1 | `validate-management-access` | synth |
//! | `logging` | 2 | `resolve-central-log-target` | deploy |

pub mod access;
pub mod logging;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use landing_core::ExecutionPhase;
use landing_runner::{ModuleDefinition, ModuleRegistry, StageDefinition};

pub use access::AccessCheckModule;
pub use logging::CentralLogTargetModule;

/// Stage holding the pre-flight checks.
pub const PREPARE_STAGE: &str = "prepare";
/// Stage resolving centralized logging.
pub const LOGGING_STAGE: &str = "logging";

/// The registry of built-in stages and modules.
#[must_use]
pub fn default_registry() -> ModuleRegistry {
    ModuleRegistry::default()
        .with_stage(StageDefinition::new(PREPARE_STAGE, 1).with_module(ModuleDefinition::new(
            access::NAME,
            1,
            ExecutionPhase::Synth,
            Arc::new(AccessCheckModule),
        )))
        .with_stage(StageDefinition::new(LOGGING_STAGE, 2).with_module(ModuleDefinition::new(
            logging::NAME,
            1,
            ExecutionPhase::Deploy,
            Arc::new(CentralLogTargetModule),
        )))
}
