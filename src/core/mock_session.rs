//! Mock management endpoints for testing without real UCS hardware
//!
//! Provides an in-memory [`ManagementApi`], a connector that hands one out per
//! address, and a static host resolver. Every call is recorded in a shared
//! [`CallLog`] so tests can assert on attempt order and logout counts.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::session::{ApiConnector, LoginInfo, ManagedObject, ManagementApi, PropertyFilter};
use super::validation::HostResolver;
use crate::models::{BackendKind, SecureString};
use crate::utils::ApiError;

/// Simulated endpoint behaviour
#[derive(Debug, Clone)]
pub enum MockBackend {
    /// Login succeeds; queries return `faults`
    Healthy {
        faults: Vec<ManagedObject>,
        version: Option<String>,
    },
    /// Login is rejected with the given description
    Rejecting(String),
    /// Login never completes
    Hanging,
    /// Login succeeds; every class query fails
    QueryFails(String),
}

impl MockBackend {
    pub fn healthy(faults: Vec<ManagedObject>) -> Self {
        MockBackend::Healthy {
            faults,
            version: Some("4.1(3b)".to_string()),
        }
    }

    /// Login succeeds and reports `version` as the running firmware
    pub fn firmware(version: &str) -> Self {
        MockBackend::Healthy {
            faults: sample_faults(),
            version: Some(version.to_string()),
        }
    }

    pub fn rejecting(description: &str) -> Self {
        MockBackend::Rejecting(description.to_string())
    }

    pub fn hanging() -> Self {
        MockBackend::Hanging
    }

    pub fn query_fails(message: &str) -> Self {
        MockBackend::QueryFails(message.to_string())
    }
}

/// One recorded call against a mock endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Open(String),
    Login(String),
    Resolve {
        address: String,
        filter: Option<PropertyFilter>,
    },
    Logout(String),
    Lookup(String),
}

/// Shared, cloneable record of calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<ApiCall>>>);

impl CallLog {
    fn push(&self, call: ApiCall) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.0.lock().unwrap().clone()
    }

    /// Filters passed to each class query, in order
    pub fn filters(&self) -> Vec<Option<PropertyFilter>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Resolve { filter, .. } => Some(filter),
                _ => None,
            })
            .collect()
    }

    /// Addresses a transport was opened for, in order
    pub fn opened(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Open(addr) => Some(addr),
                _ => None,
            })
            .collect()
    }

    /// Addresses a class query was sent to
    pub fn queried(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Resolve { address, .. } => Some(address),
                _ => None,
            })
            .collect()
    }

    pub fn logins(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::Login(_)))
            .count()
    }

    pub fn logouts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::Logout(_)))
            .count()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Lookup(host) => Some(host),
                _ => None,
            })
            .collect()
    }
}

/// In-memory management API for one address
pub struct MockManagementApi {
    address: String,
    backend: MockBackend,
    log: CallLog,
    logged_in: bool,
}

impl MockManagementApi {
    pub fn new(address: &str, backend: MockBackend) -> (Self, CallLog) {
        let log = CallLog::default();
        (Self::with_log(address, backend, log.clone()), log)
    }

    pub fn with_log(address: &str, backend: MockBackend, log: CallLog) -> Self {
        Self {
            address: address.to_string(),
            backend,
            log,
            logged_in: false,
        }
    }
}

#[async_trait::async_trait]
impl ManagementApi for MockManagementApi {
    async fn login(
        &mut self,
        _username: &str,
        _password: &SecureString,
    ) -> Result<LoginInfo, ApiError> {
        self.log.push(ApiCall::Login(self.address.clone()));
        match &self.backend {
            MockBackend::Healthy { version, .. } => {
                self.logged_in = true;
                Ok(LoginInfo {
                    version: version.clone(),
                })
            }
            MockBackend::QueryFails(_) => {
                self.logged_in = true;
                Ok(LoginInfo::default())
            }
            MockBackend::Rejecting(description) => Err(ApiError::Rejected {
                code: "551".to_string(),
                description: description.clone(),
            }),
            MockBackend::Hanging => std::future::pending().await,
        }
    }

    async fn resolve_class(
        &mut self,
        _class_id: &str,
        filter: Option<&PropertyFilter>,
    ) -> Result<Vec<ManagedObject>, ApiError> {
        self.log.push(ApiCall::Resolve {
            address: self.address.clone(),
            filter: filter.cloned(),
        });
        if !self.logged_in {
            return Err(ApiError::NotLoggedIn);
        }
        match &self.backend {
            MockBackend::Healthy { faults, .. } => Ok(faults
                .iter()
                .filter(|obj| match filter {
                    Some(f) => obj.attr(&f.property) == Some(f.value.as_str()),
                    None => true,
                })
                .cloned()
                .collect()),
            MockBackend::QueryFails(message) => Err(ApiError::Http(message.clone())),
            _ => Err(ApiError::NotLoggedIn),
        }
    }

    async fn logout(&mut self) -> Result<(), ApiError> {
        self.log.push(ApiCall::Logout(self.address.clone()));
        self.logged_in = false;
        Ok(())
    }
}

/// Connector mapping addresses to simulated endpoints
///
/// Addresses without an entry fail to open, like an unreachable host.
#[derive(Default)]
pub struct MockConnector {
    endpoints: HashMap<String, MockBackend>,
    log: CallLog,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, address: &str, backend: MockBackend) -> Self {
        self.endpoints.insert(address.to_string(), backend);
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl ApiConnector for MockConnector {
    fn open(
        &self,
        address: &str,
        _backend: BackendKind,
    ) -> Result<Box<dyn ManagementApi>, ApiError> {
        self.log.push(ApiCall::Open(address.to_string()));
        let backend = self
            .endpoints
            .get(address)
            .cloned()
            .ok_or_else(|| ApiError::Http(format!("connection refused by {}", address)))?;
        Ok(Box::new(MockManagementApi::with_log(
            address,
            backend,
            self.log.clone(),
        )))
    }
}

/// Resolver that knows a fixed set of host names
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    known: HashSet<String>,
    log: CallLog,
}

impl StaticResolver {
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
            log: CallLog::default(),
        }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

#[async_trait::async_trait]
impl HostResolver for StaticResolver {
    async fn resolve(&self, host: &str, _port: u16) -> Result<(), String> {
        self.log.push(ApiCall::Lookup(host.to_string()));
        if self.known.contains(host) {
            Ok(())
        } else {
            Err(format!("could not resolve '{}'", host))
        }
    }
}

/// Typical active fault list in backend order
pub fn sample_faults() -> Vec<ManagedObject> {
    let fault = |code: &str, created: &str, severity: &str, cause: &str, descr: &str| {
        ManagedObject::new("faultInst")
            .with_attr("code", code)
            .with_attr("created", created)
            .with_attr("severity", severity)
            .with_attr("cause", cause)
            .with_attr("descr", descr)
            .with_attr("dn", format!("sys/fault-{}", code))
    };

    vec![
        fault(
            "F0283",
            "2024-03-01T10:22:13.512",
            "major",
            "link-down",
            "ether port 1/17 on fabric interconnect A oper state: link-down",
        ),
        fault(
            "F0369",
            "2024-03-02T08:01:44.003",
            "critical",
            "equipment-inoperable",
            "Power supply 2 in chassis 1 operability: inoperable",
        ),
        fault(
            "F0181",
            "2024-03-02T09:15:27.990",
            "warning",
            "equipment-degraded",
            "Local disk 1 on server 1/3 operability: degraded",
        ),
        fault(
            "F0185",
            "2024-03-03T12:40:02.118",
            "Critical",
            "thermal-problem",
            "DIMM A1 on server 1/5 temperature: upper-critical",
        ),
        fault(
            "F0156",
            "2024-03-03T14:05:51.721",
            "info",
            "config-failure",
            "Service profile web-01 configuration is pending",
        ),
    ]
}
