//! Scheduler and module error types.

use landing_core::{AccountId, AwsRegion, CoreError};
use landing_credentials::CredentialError;
use landing_fanout::FanOutError;

/// Why a module handler rejected.
///
/// A rejection aborts the module's scheduling group unless the run tolerates
/// module failures. Per-target problems that should not abort anything belong
/// in the module's fan-out report instead.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Credentials could not be obtained.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// A fail-fast fan-out found failing targets.
    #[error(transparent)]
    FanOut(#[from] FanOutError),

    /// The module needs credentials for an account that does not participate.
    #[error("no credentials available for account {account_id} in {region}")]
    MissingCredentials {
        /// Account the role could not be assumed in.
        account_id: AccountId,
        /// Region of the request.
        region: AwsRegion,
    },

    /// The resolved configuration does not support what the module needs.
    #[error(transparent)]
    Config(#[from] CoreError),

    /// Module specific failure.
    #[error("{0}")]
    Failed(String),
}

/// Fatal errors of a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A stage name appears more than once in the registry.
    #[error("stage \"{0}\" is registered more than once")]
    DuplicateStage(String),

    /// The run configuration is invalid.
    #[error(transparent)]
    Config(#[from] CoreError),

    /// Seed credentials could not be loaded.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// A module rejected and the run does not tolerate module failures.
    #[error("module \"{module}\" in stage \"{stage}\" failed: {source}")]
    ModuleFailed {
        /// Stage of the failing module.
        stage: String,
        /// The failing module.
        module: String,
        /// The rejection.
        #[source]
        source: ModuleError,
    },

    /// The run state machine was driven through an illegal transition.
    #[error("invalid run state transition from {from} to {to}")]
    InvalidTransition {
        /// State before the transition.
        from: String,
        /// Requested state.
        to: String,
    },
}

/// Result type alias for scheduler operations.
pub type RunnerResult<T> = Result<T, RunnerError>;
