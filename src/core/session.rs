//! Protocol session abstraction for UCS Manager / Cisco IMC
//!
//! [`ManagementApi`] is the opaque transport (login, class query, logout).
//! [`FaultSession`] layers each backend's fault-filtering semantics on top of
//! it. The real XML API transport lives in `src/platform/`.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::constants::{
    CONTROLLER_CONNECT_TIMEOUT_SECS, FAULT_CLASS_ID, MIN_CONTROLLER_FIRMWARE_MAJOR,
    SEVERITY_PROPERTY,
};
use crate::models::{BackendKind, Credentials, FaultRecord, SecureString, Severity};
use crate::utils::{ApiError, SessionError};

/// A managed object returned by a class query: class id plus attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedObject {
    pub class_id: String,
    pub attributes: BTreeMap<String, String>,
}

impl ManagedObject {
    pub fn new(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn attr_or_empty(&self, name: &str) -> String {
        self.attr(name).unwrap_or_default().to_string()
    }
}

/// Server-side equality predicate on one property of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    pub class_id: String,
    pub property: String,
    pub value: String,
}

impl PropertyFilter {
    pub fn equal(class_id: &str, property: &str, value: &str) -> Self {
        Self {
            class_id: class_id.to_string(),
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

/// Details reported by a successful login
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInfo {
    /// Firmware/API version string, e.g. `4.1(3b)`
    pub version: Option<String>,
}

/// Opaque management API transport bound to one address
#[async_trait::async_trait]
pub trait ManagementApi: Send {
    /// Authenticate and open a session cookie
    async fn login(&mut self, username: &str, password: &SecureString)
        -> Result<LoginInfo, ApiError>;

    /// Resolve every object of `class_id`, optionally filtered server-side
    async fn resolve_class(
        &mut self,
        class_id: &str,
        filter: Option<&PropertyFilter>,
    ) -> Result<Vec<ManagedObject>, ApiError>;

    /// Release the session cookie
    async fn logout(&mut self) -> Result<(), ApiError>;
}

/// Opens a fresh transport for one candidate address
pub trait ApiConnector: Send + Sync {
    fn open(&self, address: &str, backend: BackendKind)
        -> Result<Box<dyn ManagementApi>, ApiError>;
}

/// Fault query capability shared by both backends
#[async_trait::async_trait]
pub trait FaultSession: Send {
    fn backend(&self) -> BackendKind;

    /// Address this session is bound to
    fn address(&self) -> &str;

    async fn connect(&mut self, credentials: &Credentials) -> Result<(), SessionError>;

    /// Active faults, restricted to `filter` when given
    async fn query_faults(
        &mut self,
        filter: Option<Severity>,
    ) -> Result<Vec<FaultRecord>, SessionError>;

    /// Log out; a no-op unless connected
    async fn disconnect(&mut self);
}

fn fault_from_object(obj: &ManagedObject) -> FaultRecord {
    FaultRecord::new(
        obj.attr_or_empty("created"),
        obj.attr("severity").unwrap_or_default(),
        obj.attr_or_empty("cause"),
        obj.attr_or_empty("descr"),
    )
    .with_code(obj.attr("code").map(str::to_string))
    .with_dn(obj.attr("dn").map(str::to_string))
}

async fn logout_quietly(api: &mut dyn ManagementApi, address: &str) {
    if let Err(e) = api.logout().await {
        tracing::warn!(%address, error = %e, "logout failed");
    } else {
        tracing::debug!(%address, "logged out");
    }
}

/// UCS Manager session: severity filtering happens on the server
pub struct ClusterManagerSession {
    address: String,
    api: Box<dyn ManagementApi>,
    connected: bool,
}

impl ClusterManagerSession {
    pub fn new(address: impl Into<String>, api: Box<dyn ManagementApi>) -> Self {
        Self {
            address: address.into(),
            api,
            connected: false,
        }
    }
}

#[async_trait::async_trait]
impl FaultSession for ClusterManagerSession {
    fn backend(&self) -> BackendKind {
        BackendKind::ClusterManager
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        tracing::debug!(address = %self.address, user = %credentials.username(), "ucsm login");
        self.api
            .login(credentials.username().as_str(), credentials.password())
            .await
            .map_err(|e| SessionError::Connect {
                address: self.address.clone(),
                message: e.to_string(),
            })?;
        self.connected = true;
        Ok(())
    }

    async fn query_faults(
        &mut self,
        filter: Option<Severity>,
    ) -> Result<Vec<FaultRecord>, SessionError> {
        let predicate = filter
            .map(|sev| PropertyFilter::equal(FAULT_CLASS_ID, SEVERITY_PROPERTY, sev.as_str()));

        let objects = self
            .api
            .resolve_class(FAULT_CLASS_ID, predicate.as_ref())
            .await
            .map_err(|e| SessionError::Query {
                address: self.address.clone(),
                message: e.to_string(),
            })?;

        Ok(objects.iter().map(fault_from_object).collect())
    }

    async fn disconnect(&mut self) {
        if std::mem::take(&mut self.connected) {
            logout_quietly(self.api.as_mut(), &self.address).await;
        }
    }
}

/// Cisco IMC session: full fault list, filtered on the client
pub struct ControllerSession {
    address: String,
    api: Box<dyn ManagementApi>,
    connect_timeout: Duration,
    connected: bool,
}

impl ControllerSession {
    pub fn new(address: impl Into<String>, api: Box<dyn ManagementApi>) -> Self {
        Self {
            address: address.into(),
            api,
            connect_timeout: Duration::from_secs(CONTROLLER_CONNECT_TIMEOUT_SECS),
            connected: false,
        }
    }

    fn connect_error(&self, message: impl Into<String>) -> SessionError {
        SessionError::Connect {
            address: self.address.clone(),
            message: message.into(),
        }
    }
}

/// Leading major number of a firmware string such as `4.1(3b)`
fn firmware_major(version: &str) -> Option<u32> {
    let digits: String = version
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn is_firmware_rejection(err: &ApiError) -> bool {
    match err {
        ApiError::Rejected { description, .. } => {
            let lower = description.to_lowercase();
            lower.contains("firmware")
                && (lower.contains("not supported") || lower.contains("unsupported"))
        }
        _ => false,
    }
}

#[async_trait::async_trait]
impl FaultSession for ControllerSession {
    fn backend(&self) -> BackendKind {
        BackendKind::Controller
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        tracing::debug!(
            address = %self.address,
            user = %credentials.username(),
            timeout = ?self.connect_timeout,
            "cimc login"
        );

        let limit = self.connect_timeout;
        let login = tokio::time::timeout(
            limit,
            self.api
                .login(credentials.username().as_str(), credentials.password()),
        )
        .await
        .map_err(|_| self.connect_error(format!("login timed out after {:?}", limit)))?;

        let info = match login {
            Ok(info) => info,
            Err(e) if is_firmware_rejection(&e) => {
                return Err(SessionError::UnsupportedFirmware {
                    address: self.address.clone(),
                    version: "unknown".to_string(),
                });
            }
            Err(e) => return Err(self.connect_error(e.to_string())),
        };

        if let Some(version) = info.version.as_deref() {
            if firmware_major(version).is_some_and(|major| major < MIN_CONTROLLER_FIRMWARE_MAJOR) {
                logout_quietly(self.api.as_mut(), &self.address).await;
                return Err(SessionError::UnsupportedFirmware {
                    address: self.address.clone(),
                    version: version.to_string(),
                });
            }
        }

        self.connected = true;
        Ok(())
    }

    async fn query_faults(
        &mut self,
        filter: Option<Severity>,
    ) -> Result<Vec<FaultRecord>, SessionError> {
        let objects = self
            .api
            .resolve_class(FAULT_CLASS_ID, None)
            .await
            .map_err(|e| SessionError::Query {
                address: self.address.clone(),
                message: e.to_string(),
            })?;

        let mut faults: Vec<FaultRecord> = objects.iter().map(fault_from_object).collect();
        if let Some(sev) = filter {
            let total = faults.len();
            // Stored severities are lowercased, so this match ignores case
            faults.retain(|f| f.severity() == sev.as_str());
            tracing::debug!(
                address = %self.address,
                severity = %sev,
                kept = faults.len(),
                total,
                "client-side severity filter applied"
            );
        }
        Ok(faults)
    }

    async fn disconnect(&mut self) {
        if std::mem::take(&mut self.connected) {
            logout_quietly(self.api.as_mut(), &self.address).await;
        }
    }
}

/// Wrapper to hold either backend's session
pub enum BackendSession {
    ClusterManager(ClusterManagerSession),
    Controller(ControllerSession),
}

impl BackendSession {
    /// Build the session variant matching `backend`, bound to `address`
    pub fn open(backend: BackendKind, address: &str, api: Box<dyn ManagementApi>) -> Self {
        match backend {
            BackendKind::ClusterManager => {
                BackendSession::ClusterManager(ClusterManagerSession::new(address, api))
            }
            BackendKind::Controller => {
                BackendSession::Controller(ControllerSession::new(address, api))
            }
        }
    }

    pub fn as_session_mut(&mut self) -> &mut dyn FaultSession {
        match self {
            BackendSession::ClusterManager(s) => s,
            BackendSession::Controller(s) => s,
        }
    }
}
