//! # Domain Models
//!
//! Core data structures: credentials, target identity, severity and fault records.
//!
//! ## Security Design
//!
//! The [`SecureString`] type holds the management password:
//! - Password data is zeroed on drop to prevent leakage via swap/core dumps
//! - Never exposed in `Debug` or `Display` implementations
//!
//! ## Credential Resolution
//!
//! Credentials come from an INI file with one section per target plus a
//! `DEFAULT` section. Each field is taken from the most specific place it is set:
//! command line (backend type and alternates only) → host section → `DEFAULT`.

pub mod credentials;
pub mod target;

pub use credentials::{Credentials, SecureString, Username};
pub use target::{
    AttemptOutcome, BackendKind, ConnectionAttempt, FaultRecord, Severity, TargetIdentity,
};
