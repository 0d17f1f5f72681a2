//! # Application-Wide Constants
//!
//! Centralized configuration values and magic numbers used throughout ucs-faults.
//!
//! ## Usage
//!
//! ```rust
//! use ucs_faults::constants::*;
//! use std::time::Duration;
//!
//! let timeout = Duration::from_secs(CONTROLLER_CONNECT_TIMEOUT_SECS);
//! assert_eq!(timeout.as_secs(), 60);
//! ```

// ============================================================================
// Configuration
// ============================================================================

/// Credential file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ucsm_credentials.ini";

/// Fallback section consulted for any field a host section does not set
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Config keys
pub const KEY_USERNAME: &str = "username";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_BACKEND: &str = "type";
pub const KEY_ALTERNATES: &str = "alternates";

// ============================================================================
// Timeouts and Limits
// ============================================================================

/// Login timeout for controller (CIMC) endpoints
///
/// Standalone controllers answer slowly while the BMC is busy; the bound stops
/// a wedged controller from hanging the run. Cluster manager logins are not
/// bounded.
pub const CONTROLLER_CONNECT_TIMEOUT_SECS: u64 = 60;

/// Oldest controller firmware major version whose XML API exposes `faultInst`
pub const MIN_CONTROLLER_FIRMWARE_MAJOR: u32 = 2;

// ============================================================================
// Management API
// ============================================================================

/// HTTPS port used when an address carries no explicit port
pub const DEFAULT_API_PORT: u16 = 443;

/// XML API endpoint path (same on UCS Manager and Cisco IMC)
pub const XML_API_PATH: &str = "/nuova";

/// Managed object class holding active faults
pub const FAULT_CLASS_ID: &str = "faultInst";

/// Fault property the server-side filter matches on
pub const SEVERITY_PROPERTY: &str = "severity";
