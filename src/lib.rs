//! ucs-faults - UCS Manager / Cisco IMC active fault query
//!
//! Core library: credential resolution, address validation, protocol sessions
//! and the failover client. The binary in `main.rs` wires these to the
//! command line.

pub mod constants;
pub mod core;
pub mod logger;
pub mod models;
pub mod normalize;
pub mod platform;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    ConfigSnapshot, CredentialResolver, FailoverClient, FaultReport, ResolveRequest,
    ResolvedTarget,
};
pub use models::{BackendKind, Credentials, FaultRecord, SecureString, Severity, Username};
pub use utils::{AggregatedFailure, ConfigError, FaultQueryError, SessionError};
