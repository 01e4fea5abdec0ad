//! Cross-account credential delegation.
//!
//! Modules act on member accounts through a role assumed from the management
//! account. [`CredentialBroker`] turns (account, region, role) requests into
//! short-lived credentials, reusing them for the rest of the run and routing
//! every assumption call through the retry layer. A missing or untrusted role
//! is not an error: the broker reports it as "no credentials" so the target is
//! skipped.
//!
//! # Modules
//!
//! - [`assume`] - The [`RoleAssumer`] seam and request type
//! - [`broker`] - Per-run credential cache
//! - [`seed`] - Management account seed credentials
//! - [`sts`] - STS-backed role assumption

pub mod assume;
pub mod broker;
pub mod error;
pub mod seed;
pub mod sts;

pub use assume::{CredentialRequest, RoleAssumer};
pub use broker::CredentialBroker;
pub use error::{AssumeRoleError, CredentialError};
pub use seed::{DefaultChainSeed, SeedCredentialSource, StaticSeed};
pub use sts::{DEFAULT_SESSION_NAME, StsRoleAssumer};
