//! Runtime configuration for the landing zone runner.
//!
//! All configuration is driven by environment variables. Values that fail to
//! parse are reported as [`CoreError`]s rather than silently defaulted.

use std::env;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::{AwsRegion, ExecutionPhase, Partition};

/// Global runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingConfig {
    /// Log level.
    pub log_level: String,
    /// AWS partition.
    pub partition: Partition,
    /// Region the runner operates from.
    pub home_region: AwsRegion,
    /// Maximum number of per-target actions a module runs at once.
    pub max_concurrency: usize,
    /// Report what would change without changing it.
    pub dry_run: bool,
    /// Solution identifier attached to remote calls.
    pub solution_id: String,
    /// Prefix for resources created by the landing zone.
    pub resource_prefix: String,
    /// Total attempts for a throttled remote call.
    pub retry_max_attempts: u32,
    /// First backoff delay in milliseconds.
    pub retry_base_delay_ms: u64,
    /// Upper bound for a single backoff delay in milliseconds.
    pub retry_max_delay_ms: u64,
    /// Path of the resolved configuration document.
    pub config_path: String,
    /// Single stage to run; `None` runs the whole pipeline.
    pub stage: Option<String>,
    /// Phase used to filter modules of a single stage.
    pub phase: ExecutionPhase,
    /// Keep scheduling after a module fails.
    pub tolerate_module_failures: bool,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            partition: Partition::default(),
            home_region: AwsRegion::default(),
            max_concurrency: 10,
            dry_run: false,
            solution_id: "SO0199".to_owned(),
            resource_prefix: "landing-zone".to_owned(),
            retry_max_attempts: 8,
            retry_base_delay_ms: 150,
            retry_max_delay_ms: 10_000,
            config_path: "config.json".to_owned(),
            stage: None,
            phase: ExecutionPhase::default(),
            tolerate_module_failures: false,
        }
    }
}

impl LandingConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `LOG_LEVEL` | `info` |
    /// | `PARTITION` | `aws` |
    /// | `HOME_REGION` | `us-east-1` |
    /// | `MAX_CONCURRENCY` | `10` |
    /// | `DRY_RUN` | `false` |
    /// | `SOLUTION_ID` | `SO0199` |
    /// | `RESOURCE_PREFIX` | `landing-zone` |
    /// | `RETRY_MAX_ATTEMPTS` | `8` |
    /// | `RETRY_BASE_DELAY_MS` | `150` |
    /// | `RETRY_MAX_DELAY_MS` | `10000` |
    /// | `CONFIG_PATH` | `config.json` |
    /// | `STAGE` | *(unset = full pipeline)* |
    /// | `EXECUTION_PHASE` | `deploy` |
    /// | `TOLERATE_MODULE_FAILURES` | `false` |
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("PARTITION") {
            config.partition = v.parse()?;
        }
        if let Some(v) = lookup("HOME_REGION") {
            config.home_region = AwsRegion::new(v);
        }
        if let Some(v) = lookup("MAX_CONCURRENCY") {
            config.max_concurrency = parse_number("MAX_CONCURRENCY", &v)?;
        }
        if let Some(v) = lookup("DRY_RUN") {
            config.dry_run = parse_bool(&v);
        }
        if let Some(v) = lookup("SOLUTION_ID") {
            config.solution_id = v;
        }
        if let Some(v) = lookup("RESOURCE_PREFIX") {
            config.resource_prefix = v;
        }
        if let Some(v) = lookup("RETRY_MAX_ATTEMPTS") {
            config.retry_max_attempts = parse_number("RETRY_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("RETRY_BASE_DELAY_MS") {
            config.retry_base_delay_ms = parse_number("RETRY_BASE_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("RETRY_MAX_DELAY_MS") {
            config.retry_max_delay_ms = parse_number("RETRY_MAX_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("CONFIG_PATH") {
            config.config_path = v;
        }
        if let Some(v) = lookup("STAGE") {
            let trimmed = v.trim();
            config.stage = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        }
        if let Some(v) = lookup("EXECUTION_PHASE") {
            config.phase = v.parse()?;
        }
        if let Some(v) = lookup("TOLERATE_MODULE_FAILURES") {
            config.tolerate_module_failures = parse_bool(&v);
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> CoreResult<T> {
    value.trim().parse().map_err(|_| {
        CoreError::Config(format!("{key} must be a non-negative integer, got {value:?}"))
    })
}
