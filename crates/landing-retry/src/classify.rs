//! Classification of remote errors into throttling and terminal failures.

use std::fmt;

/// Error codes the AWS control plane uses to signal rate limiting.
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottledException",
    "RequestThrottled",
    "TooManyRequestsException",
    "ProvisionedThroughputExceededException",
    "TransactionInProgressException",
    "RequestLimitExceeded",
    "BandwidthLimitExceeded",
    "LimitExceededException",
    "SlowDown",
    "PriorRequestNotComplete",
    "EC2ThrottledException",
    "ConcurrentModificationException",
];

/// How the retry layer should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient rate limiting; retried with backoff.
    Throttling,
    /// Anything else; surfaced immediately.
    Terminal,
}

/// Errors that can tell the retry layer whether they are throttling signals.
pub trait Classify {
    /// Classify this error.
    fn classify(&self) -> ErrorClass;
}

/// Classify an AWS error code.
///
/// # Examples
///
/// ```
/// use landing_retry::{ErrorClass, classify_code};
///
/// assert_eq!(classify_code("ThrottlingException"), ErrorClass::Throttling);
/// assert_eq!(classify_code("AccessDenied"), ErrorClass::Terminal);
/// ```
#[must_use]
pub fn classify_code(code: &str) -> ErrorClass {
    if THROTTLING_CODES.contains(&code) {
        ErrorClass::Throttling
    } else {
        ErrorClass::Terminal
    }
}

/// A remote call failure described by its service error code.
///
/// Module actions that wrap SDK calls map SDK errors into this type so the
/// retry layer can classify them without knowing the concrete client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// Service error code, when the service returned one.
    pub code: Option<String>,
    /// Human readable message.
    pub message: String,
}

impl RemoteError {
    /// Create an error with a service code.
    #[must_use]
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Create an error without a service code (transport failure, bad response).
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

impl Classify for RemoteError {
    fn classify(&self) -> ErrorClass {
        self.code
            .as_deref()
            .map_or(ErrorClass::Terminal, classify_code)
    }
}
