//! Landing zone module runner.
//!
//! Loads the resolved landing zone configuration, obtains management account
//! credentials from the default AWS provider chain and runs either one stage
//! or the whole pipeline of built-in modules. The status report is printed to
//! stdout; the process exits non-zero when the run fails.
//!
//! # Usage
//!
//! ```text
//! CONFIG_PATH=resolved.json STAGE=prepare EXECUTION_PHASE=synth landing-runner
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CONFIG_PATH` | `config.json` | Resolved configuration document |
//! | `STAGE` | *(unset = all)* | Single stage to run |
//! | `EXECUTION_PHASE` | `deploy` | Phase of the single stage to run |
//! | `PARTITION` | `aws` | AWS partition |
//! | `HOME_REGION` | `us-east-1` | Region for credential resolution |
//! | `MAX_CONCURRENCY` | `10` | Per-module fan-out bound |
//! | `DRY_RUN` | `false` | Report without changing anything |
//! | `TOLERATE_MODULE_FAILURES` | `false` | Keep going after a module fails |
//! | `RETRY_MAX_ATTEMPTS` | `8` | Attempts for throttled calls |
//! | `RETRY_BASE_DELAY_MS` | `150` | First backoff delay |
//! | `RETRY_MAX_DELAY_MS` | `10000` | Backoff delay cap |
//! | `LANDING_SKIPPED_MODULES` | *(empty)* | Comma-separated modules to suppress |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use landing_core::{LandingConfig, ResolvedConfig};
use landing_credentials::{DefaultChainSeed, StsRoleAssumer};
use landing_modules::default_registry;
use landing_retry::BackoffPolicy;
use landing_runner::{EnvSkipPredicate, ModuleRunner, RunParams};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so stdout carries only the report.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn load_resolved_config(path: &str) -> Result<ResolvedConfig> {
    let file = File::open(path).with_context(|| format!("failed to open configuration {path}"))?;
    ResolvedConfig::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to load configuration {path}"))
}

fn retry_policy(config: &LandingConfig) -> BackoffPolicy {
    BackoffPolicy::new(
        config.retry_max_attempts,
        Duration::from_millis(config.retry_base_delay_ms),
        Duration::from_millis(config.retry_max_delay_ms),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = LandingConfig::from_env().context("invalid environment configuration")?;
    init_tracing(&config.log_level)?;

    let resolved = load_resolved_config(&config.config_path)?;
    info!(
        config_path = %config.config_path,
        partition = %config.partition,
        management_account = %resolved.management_account_id(),
        regions = resolved.global.enabled_regions.len(),
        "loaded landing zone configuration"
    );

    let runner = ModuleRunner::new(
        default_registry(),
        resolved,
        Arc::new(StsRoleAssumer::new(config.partition)),
        Arc::new(DefaultChainSeed::new(config.home_region.clone())),
    )
    .with_skip_predicate(EnvSkipPredicate::from_env())
    .with_retry_policy(retry_policy(&config));

    let params = RunParams::from_config(&config);
    tokio::select! {
        result = runner.execute(params) => match result {
            Ok(report) => {
                println!("{report}");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "run failed");
                Err(e).context("landing zone run failed")
            }
        },
        _ = tokio::signal::ctrl_c() => {
            bail!("interrupted before the run completed");
        }
    }
}
