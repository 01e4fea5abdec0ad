//! Credential error types.

use landing_core::{AccountId, AwsRegion};
use landing_retry::{Classify, ErrorClass, RemoteError, RetryError};

/// Failure of a single role assumption call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssumeRoleError {
    /// The role does not exist or the target does not trust the caller.
    ///
    /// The broker turns this into "target does not participate" instead of
    /// an error.
    #[error("role {role_arn} cannot be assumed: {message}")]
    NotAssumable {
        /// ARN of the role that was requested.
        role_arn: String,
        /// Message returned by the service.
        message: String,
    },

    /// The remote call failed; classified by its error code.
    #[error("role assumption failed: {0}")]
    Remote(#[from] RemoteError),

    /// The service answered without usable credentials.
    #[error("invalid role assumption response: {0}")]
    InvalidResponse(String),
}

impl Classify for AssumeRoleError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::Remote(e) => e.classify(),
            Self::NotAssumable { .. } | Self::InvalidResponse(_) => ErrorClass::Terminal,
        }
    }
}

/// Errors surfaced by the credential broker and seed sources.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Seed credentials for the management account are past their expiration.
    #[error("seed credentials for management account {0} have expired")]
    SeedExpired(AccountId),

    /// Seed credentials could not be loaded.
    #[error("failed to load seed credentials: {0}")]
    Seed(String),

    /// Role assumption failed after retries.
    #[error("failed to assume role {role_name} in account {account_id} ({region}): {source}")]
    AssumeRole {
        /// Target account.
        account_id: AccountId,
        /// Target region.
        region: AwsRegion,
        /// Role that was requested.
        role_name: String,
        /// Underlying failure.
        #[source]
        source: RetryError<AssumeRoleError>,
    },

    /// The service handed back credentials that are already expired.
    #[error("credentials issued for account {account_id} ({region}) are already expired")]
    Expired {
        /// Target account.
        account_id: AccountId,
        /// Target region.
        region: AwsRegion,
    },
}
