//! Core business logic (transport-agnostic)
//!
//! CRITICAL: This module MUST NOT import HTTP, file or CLI code. Concrete
//! transports and the config loader live in `crate::platform`.

pub mod credential;
pub mod failover;
pub mod report;
pub mod session;
pub mod validation;

// Test utilities for mock endpoints (tests only)
#[cfg(test)]
pub mod mock_session;

pub use credential::{
    ConfigSection, ConfigSnapshot, CredentialResolver, ResolveRequest, ResolvedTarget,
};
pub use failover::FailoverClient;
pub use report::FaultReport;
pub use session::{
    ApiConnector, BackendSession, ClusterManagerSession, ControllerSession, FaultSession,
    LoginInfo, ManagedObject, ManagementApi, PropertyFilter,
};
pub use validation::{AddressValidator, DnsResolver, HostResolver};
