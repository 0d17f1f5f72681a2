//! Error types for ucs-faults
//!
//! All error types use thiserror for clean error handling.
//! SECURITY: Error messages MUST NOT contain passwords or sensitive data.

use std::fmt;
use std::path::PathBuf;

/// Top-level error type for a fault query run
#[derive(Debug, thiserror::Error)]
pub enum FaultQueryError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Unexpected severity \"{given}\". Should be one of: {allowed}")]
    InvalidSeverity { given: String, allowed: String },

    #[error("Unknown backend type \"{0}\". Should be one of: ucsm, cimc")]
    UnknownBackend(String),

    #[error(transparent)]
    NoValidAddress(#[from] ResolveError),

    #[error("Fault query failed: {0}")]
    Query(SessionError),

    #[error(transparent)]
    AllCandidatesFailed(#[from] AggregatedFailure),
}

/// Errors from loading or merging the credential configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file {} does not exist!", .0.display())]
    FileNotFound(PathBuf),

    #[error("Configuration file {} is not readable! ({reason})", .path.display())]
    FileUnreadable { path: PathBuf, reason: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("No configuration section for '{0}' and no DEFAULT section")]
    NoSection(String),

    #[error("Missing '{field}' for '{target}' (checked host section and DEFAULT)")]
    MissingField { target: String, field: &'static str },

    #[error("Invalid '{field}' for '{target}': {reason}")]
    InvalidField {
        target: String,
        field: &'static str,
        reason: String,
    },

    #[error("Invalid credentials for '{target}': {source}")]
    InvalidCredential {
        target: String,
        #[source]
        source: CredentialError,
    },
}

/// Errors from credential value validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username exceeds maximum length ({max})")]
    UsernameTooLong { max: usize },
}

/// Errors from candidate address resolution
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("There was a problem resolving the UCS hostname or IP address: ({})", .rejected.join(", "))]
    NoValidAddress { rejected: Vec<String> },
}

/// Errors from the management API transport
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request rejected ({code}): {description}")]
    Rejected { code: String, description: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("No active session")]
    NotLoggedIn,
}

/// Errors from a protocol session bound to one address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to connect to {address}: {message}")]
    Connect { address: String, message: String },

    #[error("Failed to connect to {address}: firmware {version} is not supported")]
    UnsupportedFirmware { address: String, version: String },

    #[error("Query against {address} failed: {message}")]
    Query { address: String, message: String },
}

impl SessionError {
    /// Address the failing session was bound to
    pub fn address(&self) -> &str {
        match self {
            SessionError::Connect { address, .. }
            | SessionError::UnsupportedFirmware { address, .. }
            | SessionError::Query { address, .. } => address,
        }
    }
}

/// Every connect failure recorded when no candidate address succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedFailure {
    errors: Vec<SessionError>,
}

impl AggregatedFailure {
    pub fn new(errors: Vec<SessionError>) -> Self {
        Self { errors }
    }

    /// Recorded errors in attempt order
    pub fn errors(&self) -> &[SessionError] {
        &self.errors
    }
}

impl fmt::Display for AggregatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "All {} candidate address(es) failed to connect",
            self.errors.len()
        )
    }
}

impl std::error::Error for AggregatedFailure {}
