//! Resolved landing zone configuration and target matrices.
//!
//! The runner never parses or validates configuration files itself. It
//! receives an already-resolved [`ResolvedConfig`] and only reads from it.
//! Modules derive their target lists from it through [`TargetMatrix`].

use std::collections::BTreeSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{AccountId, AwsRegion, Target};

/// A single account known to the landing zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    /// Logical account name used throughout the configuration.
    pub name: String,
    /// AWS account ID.
    pub id: AccountId,
    /// Root email address of the account.
    #[serde(default)]
    pub email: String,
    /// Suspended accounts never receive module actions.
    #[serde(default)]
    pub suspended: bool,
}

/// Account inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsConfig {
    /// The management (organization root) account.
    pub management_account: AccountEntry,
    /// All other accounts (log archive, audit, workloads).
    #[serde(default)]
    pub member_accounts: Vec<AccountEntry>,
}

impl AccountsConfig {
    /// Every account including the management account.
    pub fn all(&self) -> impl Iterator<Item = &AccountEntry> {
        std::iter::once(&self.management_account).chain(self.member_accounts.iter())
    }

    /// Accounts that are not suspended.
    pub fn active(&self) -> impl Iterator<Item = &AccountEntry> {
        self.all().filter(|account| !account.suspended)
    }

    /// Look up an account ID by logical name.
    #[must_use]
    pub fn account_id(&self, name: &str) -> Option<&AccountId> {
        self.all()
            .find(|account| account.name == name)
            .map(|account| &account.id)
    }
}

/// Central logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralLoggingConfig {
    /// Whether centralized logging is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Name of the account that owns the log archive.
    pub log_archive_account: String,
    /// Existing bucket to use instead of the conventional name.
    #[serde(default)]
    pub imported_bucket_name: Option<String>,
}

/// Organization-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Region the pipeline is deployed from.
    #[serde(default)]
    pub home_region: AwsRegion,
    /// Regions governed by the landing zone.
    pub enabled_regions: Vec<AwsRegion>,
    /// Role assumed in member accounts from the management account.
    pub management_account_access_role: String,
    /// Central logging settings, if configured.
    #[serde(default)]
    pub central_logging: Option<CentralLoggingConfig>,
}

/// Security service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Name of the account acting as delegated administrator.
    #[serde(default)]
    pub delegated_admin_account: Option<String>,
    /// Accounts excluded from security service enablement.
    #[serde(default)]
    pub excluded_accounts: Vec<String>,
    /// Regions excluded from security service enablement.
    #[serde(default)]
    pub excluded_regions: Vec<AwsRegion>,
}

/// Network settings consulted by modules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Whether default VPCs should be removed.
    #[serde(default)]
    pub delete_default_vpc: bool,
    /// Accounts excluded from network changes.
    #[serde(default)]
    pub excluded_accounts: Vec<String>,
    /// Regions excluded from network changes.
    #[serde(default)]
    pub excluded_regions: Vec<AwsRegion>,
}

/// Fully resolved configuration consumed by the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Account inventory.
    pub accounts: AccountsConfig,
    /// Organization-wide settings.
    pub global: GlobalConfig,
    /// Security service settings.
    #[serde(default)]
    pub security: SecurityConfig,
    /// Network settings.
    #[serde(default)]
    pub network: NetworkConfig,
}

impl ResolvedConfig {
    /// Decode a resolved configuration document.
    pub fn from_reader(reader: impl Read) -> CoreResult<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        if config.global.enabled_regions.is_empty() {
            return Err(CoreError::Config(
                "global.enabledRegions must list at least one region".to_owned(),
            ));
        }
        Ok(config)
    }

    /// ID of the management account.
    #[must_use]
    pub fn management_account_id(&self) -> &AccountId {
        &self.accounts.management_account.id
    }

    /// Start a target matrix of every active account in every enabled region.
    #[must_use]
    pub fn target_matrix(&self) -> TargetMatrix {
        TargetMatrix::new(
            self.accounts.active().map(|account| account.id.clone()),
            self.global.enabled_regions.iter().cloned(),
        )
    }
}

fn default_true() -> bool {
    true
}

/// Builder for the (account, region) cross product a module acts on.
///
/// # Examples
///
/// ```
/// use landing_core::{AccountId, AwsRegion, TargetMatrix};
///
/// let a = AccountId::new("111111111111").unwrap();
/// let b = AccountId::new("222222222222").unwrap();
/// let targets = TargetMatrix::new(
///     [a.clone(), b],
///     [AwsRegion::new("us-east-1"), AwsRegion::new("eu-west-1")],
/// )
/// .exclude_regions([AwsRegion::new("eu-west-1")])
/// .build();
/// assert_eq!(targets.len(), 2);
/// assert_eq!(targets[0].account_id, a);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TargetMatrix {
    accounts: Vec<AccountId>,
    regions: Vec<AwsRegion>,
    excluded_accounts: BTreeSet<AccountId>,
    excluded_regions: BTreeSet<AwsRegion>,
}

impl TargetMatrix {
    /// Start a matrix from accounts and regions.
    #[must_use]
    pub fn new(
        accounts: impl IntoIterator<Item = AccountId>,
        regions: impl IntoIterator<Item = AwsRegion>,
    ) -> Self {
        Self {
            accounts: accounts.into_iter().collect(),
            regions: regions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Drop the given accounts from the matrix.
    #[must_use]
    pub fn exclude_accounts(mut self, accounts: impl IntoIterator<Item = AccountId>) -> Self {
        self.excluded_accounts.extend(accounts);
        self
    }

    /// Drop the given regions from the matrix.
    #[must_use]
    pub fn exclude_regions(mut self, regions: impl IntoIterator<Item = AwsRegion>) -> Self {
        self.excluded_regions.extend(regions);
        self
    }

    /// Produce the deduplicated target list, accounts-major, in input order.
    #[must_use]
    pub fn build(self) -> Vec<Target> {
        let mut seen = BTreeSet::new();
        let mut targets = Vec::new();
        for account in &self.accounts {
            if self.excluded_accounts.contains(account) {
                continue;
            }
            for region in &self.regions {
                if self.excluded_regions.contains(region) {
                    continue;
                }
                let target = Target::new(account.clone(), region.clone());
                if seen.insert(target.clone()) {
                    targets.push(target);
                }
            }
        }
        targets
    }
}
