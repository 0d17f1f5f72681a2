//! # Utilities Module
//!
//! Cross-cutting concerns shared by the core and platform layers.
//!
//! ## Modules
//!
//! - [`errors`]: Typed error hierarchy using `thiserror` for domain-specific errors
//!
//! ## Design Notes
//!
//! Error types are defined in this module to avoid circular dependencies between
//! the `core` and `platform` modules. Per-address session errors are collected by
//! the failover loop; everything else surfaces through [`FaultQueryError`] at the
//! CLI boundary.

pub mod errors;

pub use errors::{
    AggregatedFailure, ApiError, ConfigError, CredentialError, FaultQueryError, ResolveError,
    SessionError,
};
