//! Environment-driven module suppression.

use std::collections::BTreeSet;
use std::env;

/// Environment variable listing modules to suppress, comma separated.
pub const SKIPPED_MODULES_VAR: &str = "LANDING_SKIPPED_MODULES";

/// Decides whether a module is disabled in the current environment.
///
/// A skipped module is never invoked and contributes no status line.
pub trait SkipPredicate: Send + Sync {
    /// Whether `module` must not run.
    fn should_skip(&self, module: &str) -> bool;
}

impl<F> SkipPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn should_skip(&self, module: &str) -> bool {
        self(module)
    }
}

/// Runs every module.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSkip;

impl SkipPredicate for NeverSkip {
    fn should_skip(&self, _module: &str) -> bool {
        false
    }
}

/// Skips the modules named in [`SKIPPED_MODULES_VAR`].
#[derive(Debug, Clone, Default)]
pub struct EnvSkipPredicate {
    skipped: BTreeSet<String>,
}

impl EnvSkipPredicate {
    /// Read the skip list from the environment. Unset means nothing is skipped.
    #[must_use]
    pub fn from_env() -> Self {
        env::var(SKIPPED_MODULES_VAR)
            .map(|list| Self::from_list(&list))
            .unwrap_or_default()
    }

    /// Parse a comma separated skip list.
    #[must_use]
    pub fn from_list(list: &str) -> Self {
        Self {
            skipped: list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        }
    }
}

impl SkipPredicate for EnvSkipPredicate {
    fn should_skip(&self, module: &str) -> bool {
        self.skipped.contains(module)
    }
}
