//! Target, severity and fault record types

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::utils::{FaultQueryError, SessionError};

/// Management backend a target is reached through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// UCS Manager: cluster-level manager, filters server-side
    ClusterManager,
    /// Cisco IMC: per-device controller, unfiltered queries only
    Controller,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::ClusterManager => "ucsm",
            BackendKind::Controller => "cimc",
        }
    }
}

impl FromStr for BackendKind {
    type Err = FaultQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ucsm" | "cluster-manager" => Ok(BackendKind::ClusterManager),
            "cimc" | "imc" | "controller" => Ok(BackendKind::Controller),
            _ => Err(FaultQueryError::UnknownBackend(s.trim().to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fault severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Warning,
    Info,
}

impl Severity {
    /// Every accepted severity in order
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::Major,
        Severity::Minor,
        Severity::Warning,
        Severity::Info,
    ];

    /// Canonical (lowercase) form
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Parse an optional user-supplied filter (case-insensitive)
    pub fn parse_filter(raw: Option<&str>) -> Result<Option<Severity>, FaultQueryError> {
        raw.map(str::parse::<Severity>).transpose()
    }

    fn allowed_list() -> String {
        Severity::ALL
            .iter()
            .map(Severity::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Severity {
    type Err = FaultQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == lowered)
            .ok_or_else(|| FaultQueryError::InvalidSeverity {
                given: lowered,
                allowed: Severity::allowed_list(),
            })
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical device identity with its candidate addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetIdentity {
    /// Primary hostname or address (also the configuration section key)
    pub primary: String,
    /// Alternate addresses in retry priority order
    pub alternates: Vec<String>,
    pub backend: BackendKind,
}

impl TargetIdentity {
    /// Primary followed by alternates, in attempt order
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str())
            .chain(self.alternates.iter().map(String::as_str))
    }
}

/// One active fault as returned by a session query
///
/// Read-only; only sessions construct these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultRecord {
    created: String,
    severity: String,
    cause: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dn: Option<String>,
}

impl FaultRecord {
    pub(crate) fn new(
        created: impl Into<String>,
        severity: &str,
        cause: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            created: created.into(),
            severity: severity.trim().to_lowercase(),
            cause: cause.into(),
            description: description.into(),
            code: None,
            dn: None,
        }
    }

    pub(crate) fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    pub(crate) fn with_dn(mut self, dn: Option<String>) -> Self {
        self.dn = dn;
        self
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    /// Severity in canonical lowercase form
    pub fn severity(&self) -> &str {
        &self.severity
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {}: {}",
            self.created, self.severity, self.cause, self.description
        )
    }
}

/// Outcome of trying one candidate address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Connected,
    Failed(SessionError),
}

/// Record of a single candidate address attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAttempt {
    pub address: String,
    pub outcome: AttemptOutcome,
}

impl ConnectionAttempt {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            outcome: AttemptOutcome::Connected,
        }
    }

    pub fn failed(error: SessionError) -> Self {
        Self {
            address: error.address().to_string(),
            outcome: AttemptOutcome::Failed(error),
        }
    }

    pub fn error(&self) -> Option<&SessionError> {
        match &self.outcome {
            AttemptOutcome::Connected => None,
            AttemptOutcome::Failed(err) => Some(err),
        }
    }
}
