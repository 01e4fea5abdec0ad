//! [`RoleAssumer`] backed by the AWS Security Token Service.

use std::time::SystemTime;

use async_trait::async_trait;
use aws_sdk_sts::config::{BehaviorVersion, Region};
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata};
use chrono::DateTime;
use landing_core::{Credentials, Partition};
use landing_retry::RemoteError;
use tracing::debug;

use crate::assume::{CredentialRequest, RoleAssumer};
use crate::error::AssumeRoleError;

/// Session name used when none is configured.
pub const DEFAULT_SESSION_NAME: &str = "landing-module-runner";

/// Error codes meaning the role is absent or does not trust the caller.
///
/// Codes about the caller's own credentials (`InvalidClientTokenId`,
/// `ExpiredToken`) are not listed: they fail every target alike.
const NOT_ASSUMABLE_CODES: &[&str] = &["AccessDenied", "NoSuchEntity"];

/// Assumes roles through STS, one client per call in the target region.
#[derive(Debug, Clone)]
pub struct StsRoleAssumer {
    partition: Partition,
    session_name: String,
    duration_seconds: Option<i32>,
}

impl StsRoleAssumer {
    /// Create an assumer for the given partition.
    #[must_use]
    pub fn new(partition: Partition) -> Self {
        Self {
            partition,
            session_name: DEFAULT_SESSION_NAME.to_owned(),
            duration_seconds: None,
        }
    }

    /// Request a specific session duration instead of the role default.
    #[must_use]
    pub fn with_duration_seconds(mut self, seconds: i32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    fn client(&self, request: &CredentialRequest<'_>) -> aws_sdk_sts::Client {
        let seed = request.seed;
        let credentials = aws_sdk_sts::config::Credentials::new(
            seed.access_key_id.clone(),
            seed.secret_access_key.clone(),
            seed.session_token.clone(),
            seed.expiration.map(SystemTime::from),
            "landing-seed",
        );
        let config = aws_sdk_sts::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(request.region.as_str().to_owned()))
            .credentials_provider(credentials)
            .build();
        aws_sdk_sts::Client::from_conf(config)
    }
}

#[async_trait]
impl RoleAssumer for StsRoleAssumer {
    async fn assume_role(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<Credentials, AssumeRoleError> {
        let role_arn = self.partition.role_arn(request.account_id, request.role_name);
        debug!(role_arn = %role_arn, region = %request.region, "assuming role");

        let output = self
            .client(request)
            .assume_role()
            .role_arn(&role_arn)
            .role_session_name(&self.session_name)
            .set_duration_seconds(self.duration_seconds)
            .send()
            .await
            .map_err(|e| {
                sdk_failure(
                    &role_arn,
                    e.code(),
                    &DisplayErrorContext(&e).to_string(),
                )
            })?;

        let creds = output.credentials().ok_or_else(|| {
            AssumeRoleError::InvalidResponse(format!("no credentials returned for {role_arn}"))
        })?;
        let expiration = creds.expiration();
        let expiration = DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos())
            .ok_or_else(|| {
                AssumeRoleError::InvalidResponse(format!(
                    "credential expiration for {role_arn} is out of range"
                ))
            })?;

        Ok(Credentials::new(
            creds.access_key_id(),
            creds.secret_access_key(),
            Some(creds.session_token().to_owned()),
            Some(expiration),
        ))
    }
}

/// Map an STS failure to the broker's error vocabulary.
fn sdk_failure(role_arn: &str, code: Option<&str>, message: &str) -> AssumeRoleError {
    match code {
        Some(code) if NOT_ASSUMABLE_CODES.contains(&code) => AssumeRoleError::NotAssumable {
            role_arn: role_arn.to_owned(),
            message: message.to_owned(),
        },
        Some(code) => AssumeRoleError::Remote(RemoteError::with_code(code, message)),
        None => AssumeRoleError::Remote(RemoteError::other(message)),
    }
}
