//! Credential and target parameter resolution
//!
//! Merges the command line with a two-level configuration snapshot (one section
//! per target, plus `DEFAULT`) into a complete [`ResolvedTarget`].

use std::collections::BTreeMap;

use crate::constants::{DEFAULT_SECTION, KEY_ALTERNATES, KEY_BACKEND, KEY_PASSWORD, KEY_USERNAME};
use crate::models::{BackendKind, Credentials, SecureString, TargetIdentity, Username};
use crate::normalize::{normalize_host_name, parse_address_list};
use crate::utils::{ConfigError, FaultQueryError};

/// Key/value pairs of one configuration section
///
/// Keys are stored lowercase. [`ConfigSection::get`] treats blank values as
/// unset; [`ConfigSection::get_raw`] keeps them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSection {
    values: BTreeMap<String, String>,
}

impl ConfigSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.trim().to_ascii_lowercase(), value.into());
    }

    /// Value for `key` as written, blank values included
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// Value for `key`, or `None` when missing or blank
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_raw(key).filter(|v| !v.trim().is_empty())
    }
}

/// Immutable view of the credential file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    sections: BTreeMap<String, ConfigSection>,
    default: Option<ConfigSection>,
}

impl ConfigSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, section: ConfigSection) -> Self {
        self.insert_section(DEFAULT_SECTION, section);
        self
    }

    pub fn with_section(mut self, name: &str, section: ConfigSection) -> Self {
        self.insert_section(name, section);
        self
    }

    /// Add a section; a section named `DEFAULT` (any case) becomes the fallback
    pub fn insert_section(&mut self, name: &str, section: ConfigSection) {
        let name = name.trim();
        if name.eq_ignore_ascii_case(DEFAULT_SECTION) {
            self.default = Some(section);
        } else {
            self.sections.insert(name.to_string(), section);
        }
    }

    /// Section for `target`: exact match first, then case-insensitive
    pub fn section_for(&self, target: &str) -> Option<&ConfigSection> {
        self.sections.get(target).or_else(|| {
            self.sections
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(target))
                .map(|(_, section)| section)
        })
    }

    pub fn default_section(&self) -> Option<&ConfigSection> {
        self.default.as_ref()
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Primary host; also the section key
    pub host: String,
    /// Explicit backend kind (`--type`)
    pub backend: Option<String>,
    /// Explicit alternates; when non-empty they replace the configured list
    pub alternates: Vec<String>,
}

/// Everything needed to start the failover loop
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub identity: TargetIdentity,
    pub credentials: Credentials,
}

/// Merges command line, host section and `DEFAULT` section
///
/// Precedence per field: command line (backend kind, alternates) → host
/// section → `DEFAULT`. Pure: the snapshot is owned and never mutated.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    config: ConfigSnapshot,
}

impl CredentialResolver {
    pub fn new(config: ConfigSnapshot) -> Self {
        Self { config }
    }

    pub fn resolve(&self, request: &ResolveRequest) -> Result<ResolvedTarget, FaultQueryError> {
        let host = normalize_host_name(&request.host).map_err(|reason| ConfigError::InvalidField {
            target: request.host.clone(),
            field: "host",
            reason,
        })?;

        let host_section = self.config.section_for(&host);
        let default_section = self.config.default_section();

        if host_section.is_none() && default_section.is_none() {
            return Err(ConfigError::NoSection(host).into());
        }

        if host_section.is_some() {
            tracing::debug!(target_host = %host, "using host-specific configuration section");
        } else {
            tracing::debug!(target_host = %host, "no host section, using DEFAULT");
        }

        let lookup = |key: &str| {
            host_section
                .and_then(|s| s.get(key))
                .or_else(|| default_section.and_then(|s| s.get(key)))
        };

        let missing = |field: &'static str| ConfigError::MissingField {
            target: host.clone(),
            field,
        };

        let username = lookup(KEY_USERNAME).ok_or_else(|| missing(KEY_USERNAME))?;
        let username =
            Username::new(username.trim()).map_err(|source| ConfigError::InvalidCredential {
                target: host.clone(),
                source,
            })?;

        let password = lookup(KEY_PASSWORD).ok_or_else(|| missing(KEY_PASSWORD))?;
        let password = SecureString::new(password);

        let explicit_backend = request
            .backend
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty());
        let backend: BackendKind = explicit_backend
            .or_else(|| lookup(KEY_BACKEND))
            .ok_or_else(|| missing(KEY_BACKEND))?
            .parse()?;

        let explicit_alternates: Vec<String> = request
            .alternates
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();
        let alternates = if explicit_alternates.is_empty() {
            // A blank host value clears the DEFAULT list
            host_section
                .and_then(|s| s.get_raw(KEY_ALTERNATES))
                .or_else(|| default_section.and_then(|s| s.get_raw(KEY_ALTERNATES)))
                .map(parse_address_list)
                .unwrap_or_default()
        } else {
            explicit_alternates
        };

        tracing::debug!(
            target_host = %host,
            backend = %backend,
            user = %username,
            alternates = alternates.len(),
            "resolved target parameters"
        );

        Ok(ResolvedTarget {
            identity: TargetIdentity {
                primary: host,
                alternates,
                backend,
            },
            credentials: Credentials::new(username, password),
        })
    }
}
