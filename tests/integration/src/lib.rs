//! Integration tests for the landing zone module runner.
//!
//! The tests drive whole runs through [`ModuleRunner`] with an in-memory role
//! assumer and static seed credentials, so they need no AWS account. The
//! STS-backed tests are marked `#[ignore]`; run them with real management
//! account credentials:
//!
//! ```text
//! LANDING_IT_MEMBER_ACCOUNT=222222222222 cargo test -p landing-integration -- --ignored
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use landing_core::{AccountId, AwsRegion, Credentials, ExecutionPhase, ResolvedConfig};
use landing_credentials::{AssumeRoleError, CredentialRequest, RoleAssumer, StaticSeed};
use landing_retry::{BackoffPolicy, RemoteError};
use landing_runner::{ModuleDefinition, ModuleError, ModuleRegistry, ModuleRunner, handler_fn};
use parking_lot::Mutex;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Management account of [`sample_config`].
pub const MANAGEMENT: &str = "111111111111";
/// Log archive account of [`sample_config`].
pub const LOG_ARCHIVE: &str = "222222222222";
/// Audit account of [`sample_config`].
pub const AUDIT: &str = "333333333333";

/// Organization with three active accounts and one suspended, in two regions.
#[must_use]
pub fn sample_config(central_logging: bool) -> ResolvedConfig {
    let document = format!(
        r#"{{
            "accounts": {{
                "managementAccount": {{
                    "name": "Management",
                    "id": "{MANAGEMENT}",
                    "email": "root@example.com"
                }},
                "memberAccounts": [
                    {{ "name": "LogArchive", "id": "{LOG_ARCHIVE}" }},
                    {{ "name": "Audit", "id": "{AUDIT}" }},
                    {{ "name": "Retired", "id": "444444444444", "suspended": true }}
                ]
            }},
            "global": {{
                "homeRegion": "us-east-1",
                "enabledRegions": ["us-east-1", "eu-west-1"],
                "managementAccountAccessRole": "AWSControlTowerExecution",
                "centralLogging": {{
                    "enabled": {central_logging},
                    "logArchiveAccount": "LogArchive"
                }}
            }},
            "security": {{ "delegatedAdminAccount": "Audit", "excludedRegions": ["eu-west-1"] }}
        }}"#
    );
    ResolvedConfig::from_reader(document.as_bytes()).expect("sample configuration is valid")
}

/// In-memory role assumer with per-account behavior and call accounting.
#[derive(Debug, Default)]
pub struct FakeAssumer {
    denied: HashSet<String>,
    throttle_first: usize,
    calls: AtomicUsize,
    per_target: Mutex<HashMap<(String, String), usize>>,
}

impl FakeAssumer {
    /// An assumer that succeeds everywhere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the role as not assumable in `account`.
    #[must_use]
    pub fn deny(mut self, account: &str) -> Self {
        self.denied.insert(account.to_owned());
        self
    }

    /// Throttle the first `n` calls overall.
    #[must_use]
    pub fn throttle_first(mut self, n: usize) -> Self {
        self.throttle_first = n;
        self
    }

    /// Total assumption calls, throttled ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Successful assumptions for one (account, region) pair.
    #[must_use]
    pub fn assumptions_for(&self, account: &str, region: &str) -> usize {
        self.per_target
            .lock()
            .get(&(account.to_owned(), region.to_owned()))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct pairs a role was assumed for.
    #[must_use]
    pub fn distinct_targets(&self) -> usize {
        self.per_target.lock().len()
    }
}

#[async_trait]
impl RoleAssumer for FakeAssumer {
    async fn assume_role(
        &self,
        request: &CredentialRequest<'_>,
    ) -> Result<Credentials, AssumeRoleError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;
        if n < self.throttle_first {
            return Err(AssumeRoleError::Remote(RemoteError::with_code(
                "Throttling",
                "Rate exceeded",
            )));
        }
        if self.denied.contains(request.account_id.as_str()) {
            return Err(AssumeRoleError::NotAssumable {
                role_arn: format!("arn:aws:iam::{}:role/{}", request.account_id, request.role_name),
                message: "AccessDenied: not authorized to perform sts:AssumeRole".to_owned(),
            });
        }
        *self
            .per_target
            .lock()
            .entry((request.account_id.to_string(), request.region.to_string()))
            .or_default() += 1;
        Ok(Credentials::new(
            format!("ASIA{}", request.account_id),
            "delegated-secret",
            Some("delegated-token".to_owned()),
            None,
        ))
    }
}

/// Seed credentials of the management account.
#[must_use]
pub fn seed() -> Credentials {
    Credentials::new("AKIAMANAGEMENT", "management-secret", None, None)
}

/// A runner over `registry` using the sample configuration and a fast retry policy.
#[must_use]
pub fn runner(
    registry: ModuleRegistry,
    assumer: Arc<FakeAssumer>,
    central_logging: bool,
) -> ModuleRunner {
    init_tracing();
    ModuleRunner::new(
        registry,
        sample_config(central_logging),
        assumer,
        Arc::new(StaticSeed::new(seed())),
    )
    .with_retry_policy(BackoffPolicy::new(
        4,
        Duration::from_millis(10),
        Duration::from_millis(40),
    ))
}

/// Records module lifecycle events in order.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Index of `event`, if it was recorded.
    #[must_use]
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.lock().iter().position(|e| e == event)
    }

    /// Names of modules that started.
    #[must_use]
    pub fn started(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| e.strip_prefix("start ").map(ToOwned::to_owned))
            .collect()
    }

    /// A module that records `start <name>` and `end <name>` around a delay.
    #[must_use]
    pub fn module(
        self: &Arc<Self>,
        name: &'static str,
        run_order: i32,
        delay_ms: u64,
        fail: bool,
    ) -> ModuleDefinition {
        let recorder = Arc::clone(self);
        ModuleDefinition::new(
            name,
            run_order,
            ExecutionPhase::Deploy,
            handler_fn(move |_| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.events.lock().push(format!("start {name}"));
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    recorder.events.lock().push(format!("end {name}"));
                    if fail {
                        Err(ModuleError::Failed(format!("{name} rejected")))
                    } else {
                        Ok(format!("{name} done"))
                    }
                }
            }),
        )
    }
}

/// Parse an account ID known to be valid.
#[must_use]
pub fn account(id: &str) -> AccountId {
    AccountId::new(id).expect("valid account id")
}

/// Shorthand for a region.
#[must_use]
pub fn region(name: &str) -> AwsRegion {
    AwsRegion::new(name)
}

mod test_pipeline;
mod test_sts;
