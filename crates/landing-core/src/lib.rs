//! Core types, configuration, and target matrices for the landing zone runner.
//!
//! This crate provides the building blocks shared by the retry, credential,
//! fan-out and scheduling crates: validated AWS identifiers, the resolved
//! configuration the runner reads from, short-lived credentials, and the
//! (account, region) targets modules act on.

mod config;
mod credentials;
mod error;
mod settings;
mod types;

pub use config::LandingConfig;
pub use credentials::Credentials;
pub use error::{CoreError, CoreResult};
pub use settings::{
    AccountEntry, AccountsConfig, CentralLoggingConfig, GlobalConfig, NetworkConfig,
    ResolvedConfig, SecurityConfig, TargetMatrix,
};
pub use types::{AccountId, AwsRegion, ExecutionOutcome, ExecutionPhase, Partition, Target};
