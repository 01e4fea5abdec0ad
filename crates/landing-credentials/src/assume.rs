//! Role assumption seam.

use async_trait::async_trait;
use landing_core::{AccountId, AwsRegion, Credentials};

use crate::error::AssumeRoleError;

/// What the caller wants credentials for.
#[derive(Debug, Clone, Copy)]
pub struct CredentialRequest<'a> {
    /// Account the credentials must act in.
    pub account_id: &'a AccountId,
    /// Region the credentials will be used in.
    pub region: &'a AwsRegion,
    /// Role to assume in the target account.
    pub role_name: &'a str,
    /// Credentials the assumption call is made with.
    pub seed: &'a Credentials,
}

/// Performs one cross-account role assumption.
///
/// The broker wraps every call in the retry layer, so implementations should
/// make exactly one remote call and report throttling through
/// [`AssumeRoleError::Remote`] with the service error code.
#[async_trait]
pub trait RoleAssumer: Send + Sync {
    /// Assume `request.role_name` in `request.account_id` using `request.seed`.
    async fn assume_role(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<Credentials, AssumeRoleError>;
}
