//! Credential broker handing out per-target delegated credentials.
//!
//! The management account is the root of every delegation chain: requests
//! for it are answered with the seed credentials as-is. Every other account
//! gets credentials through a role assumption seeded by the management
//! credentials. Results are cached per (account, region, role) for the
//! lifetime of the broker, which the runner creates once per run.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use landing_core::{AccountId, AwsRegion, Credentials};
use landing_retry::{RetryError, RetryingInvoker};
use tracing::{debug, info};

use crate::assume::{CredentialRequest, RoleAssumer};
use crate::error::{AssumeRoleError, CredentialError};

type CacheKey = (AccountId, AwsRegion, String);

/// Cached credentials are refreshed once they are this close to expiring.
const REFRESH_SKEW_SECS: i64 = 60;

/// Hands out delegated credentials for (account, region) targets.
pub struct CredentialBroker {
    assumer: Arc<dyn RoleAssumer>,
    invoker: RetryingInvoker,
    management_account: AccountId,
    cache: DashMap<CacheKey, Credentials>,
}

impl fmt::Debug for CredentialBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBroker")
            .field("management_account", &self.management_account)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl CredentialBroker {
    /// Create a broker for the given management account.
    #[must_use]
    pub fn new(
        assumer: Arc<dyn RoleAssumer>,
        invoker: RetryingInvoker,
        management_account: AccountId,
    ) -> Self {
        Self {
            assumer,
            invoker,
            management_account,
            cache: DashMap::new(),
        }
    }

    /// The management account this broker delegates from.
    #[must_use]
    pub fn management_account(&self) -> &AccountId {
        &self.management_account
    }

    /// Number of cached delegated credentials.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Obtain credentials for the requested target.
    ///
    /// Returns `Ok(None)` when the role cannot be assumed in the target
    /// account, meaning the target does not participate. Callers that need
    /// credentials must turn that into their own error naming the account.
    pub async fn get_credentials(
        &self,
        request: CredentialRequest<'_>,
    ) -> Result<Option<Credentials>, CredentialError> {
        if request.account_id == &self.management_account {
            if !request.seed.is_fresh(Duration::zero()) {
                return Err(CredentialError::SeedExpired(self.management_account.clone()));
            }
            return Ok(Some(request.seed.clone()));
        }

        let key = (
            request.account_id.clone(),
            request.region.clone(),
            request.role_name.to_owned(),
        );
        let cached = self.cache.get(&key).map(|entry| entry.value().clone());
        if let Some(creds) = cached {
            if creds.is_fresh(Duration::seconds(REFRESH_SKEW_SECS)) {
                debug!(
                    account_id = %request.account_id,
                    region = %request.region,
                    "reusing cached delegated credentials"
                );
                return Ok(Some(creds));
            }
            debug!(
                account_id = %request.account_id,
                region = %request.region,
                "cached delegated credentials are stale, refreshing"
            );
            self.cache.remove(&key);
        }

        let result = self
            .invoker
            .invoke(|| self.assumer.assume_role(&request))
            .await;

        match result {
            Ok(creds) => {
                if !creds.is_fresh(Duration::zero()) {
                    return Err(CredentialError::Expired {
                        account_id: request.account_id.clone(),
                        region: request.region.clone(),
                    });
                }
                debug!(
                    account_id = %request.account_id,
                    region = %request.region,
                    role = request.role_name,
                    "assumed role"
                );
                self.cache.insert(key, creds.clone());
                Ok(Some(creds))
            }
            Err(RetryError::Terminal(AssumeRoleError::NotAssumable { role_arn, message })) => {
                info!(
                    account_id = %request.account_id,
                    region = %request.region,
                    role_arn = %role_arn,
                    reason = %message,
                    "role not assumable, target does not participate"
                );
                Ok(None)
            }
            Err(source) => Err(CredentialError::AssumeRole {
                account_id: request.account_id.clone(),
                region: request.region.clone(),
                role_name: request.role_name.to_owned(),
                source,
            }),
        }
    }
}
