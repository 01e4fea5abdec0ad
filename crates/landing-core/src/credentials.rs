//! Short-lived AWS credentials handed to module actions.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// A set of (usually temporary) AWS credentials.
///
/// Credentials are held in memory for the duration of a run only. The
/// `Debug` implementation redacts the secret and the session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
    /// Expiration time; `None` for long-lived keys.
    pub expiration: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Create a new set of credentials.
    #[must_use]
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
        expiration: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
            expiration,
        }
    }

    /// Whether the credentials are still usable at `now`, keeping `skew` in reserve.
    ///
    /// Credentials without an expiration never go stale.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.expiration.is_none_or(|expiration| expiration - skew > now)
    }

    /// Whether the credentials are usable right now.
    #[must_use]
    pub fn is_fresh(&self, skew: Duration) -> bool {
        self.is_fresh_at(Utc::now(), skew)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .field("expiration", &self.expiration)
            .finish()
    }
}
