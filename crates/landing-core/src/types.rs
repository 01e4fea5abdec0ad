//! Common AWS type definitions shared across the runner crates.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// AWS Account ID (12-digit string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the account ID is not a 12-digit numeric string.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> serde::Deserialize<'de> for AccountId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default home region.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS partition the landing zone is deployed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Partition {
    /// Commercial regions.
    #[default]
    Aws,
    /// China regions.
    AwsCn,
    /// GovCloud (US) regions.
    AwsUsGov,
    /// ISO regions.
    AwsIso,
    /// ISO-B regions.
    AwsIsoB,
}

impl Partition {
    /// Returns the partition name as it appears in ARNs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::AwsCn => "aws-cn",
            Self::AwsUsGov => "aws-us-gov",
            Self::AwsIso => "aws-iso",
            Self::AwsIsoB => "aws-iso-b",
        }
    }

    /// Build the ARN of an IAM role in the given account.
    #[must_use]
    pub fn role_arn(&self, account: &AccountId, role_name: &str) -> String {
        format!("arn:{}:iam::{account}:role/{role_name}", self.as_str())
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "aws-cn" => Ok(Self::AwsCn),
            "aws-us-gov" => Ok(Self::AwsUsGov),
            "aws-iso" => Ok(Self::AwsIso),
            "aws-iso-b" => Ok(Self::AwsIsoB),
            _ => Err(CoreError::InvalidPartition(s.to_owned())),
        }
    }
}

/// When a module is allowed to run relative to template synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPhase {
    /// Before templates are synthesized.
    Synth,
    /// While stacks are being deployed.
    #[default]
    Deploy,
}

impl ExecutionPhase {
    /// Returns the lowercase phase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synth => "synth",
            Self::Deploy => "deploy",
        }
    }
}

impl fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionPhase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synth" => Ok(Self::Synth),
            "deploy" => Ok(Self::Deploy),
            _ => Err(CoreError::InvalidPhase(s.to_owned())),
        }
    }
}

/// One (account, region) pair a module action is applied to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Account the action runs in.
    pub account_id: AccountId,
    /// Region the action runs in.
    pub region: AwsRegion,
}

impl Target {
    /// Create a new target.
    #[must_use]
    pub fn new(account_id: AccountId, region: AwsRegion) -> Self {
        Self { account_id, region }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account_id, self.region)
    }
}

/// Result of applying an action to a single target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// The target the action ran against.
    pub target: Target,
    /// Whether the action succeeded.
    pub succeeded: bool,
    /// Status or error message reported by the action.
    pub message: String,
}

impl ExecutionOutcome {
    /// Record a successful target.
    #[must_use]
    pub fn success(target: Target, message: impl Into<String>) -> Self {
        Self {
            target,
            succeeded: true,
            message: message.into(),
        }
    }

    /// Record a failed target.
    #[must_use]
    pub fn failure(target: Target, message: impl Into<String>) -> Self {
        Self {
            target,
            succeeded: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.succeeded {
            write!(f, "{}: {}", self.target, self.message)
        } else {
            write!(f, "{}: ERROR - {}", self.target, self.message)
        }
    }
}
