//! Normalized fault query output

use std::io::{self, Write};

use crate::models::{BackendKind, ConnectionAttempt, FaultRecord};
use crate::utils::SessionError;

/// Faults returned by the first candidate that accepted a login
#[derive(Debug, Clone)]
pub struct FaultReport {
    address: String,
    backend: BackendKind,
    faults: Vec<FaultRecord>,
    attempts: Vec<ConnectionAttempt>,
}

impl FaultReport {
    pub(crate) fn new(
        address: String,
        backend: BackendKind,
        faults: Vec<FaultRecord>,
        attempts: Vec<ConnectionAttempt>,
    ) -> Self {
        Self {
            address,
            backend,
            faults,
            attempts,
        }
    }

    /// Address that answered the query
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Faults in the order the backend returned them
    pub fn faults(&self) -> &[FaultRecord] {
        &self.faults
    }

    pub fn into_faults(self) -> Vec<FaultRecord> {
        self.faults
    }

    /// Every attempt made, in order; the last one is the successful connect
    pub fn attempts(&self) -> &[ConnectionAttempt] {
        &self.attempts
    }

    /// Connect failures that preceded the successful candidate
    pub fn failed_attempts(&self) -> impl Iterator<Item = &SessionError> {
        self.attempts.iter().filter_map(ConnectionAttempt::error)
    }

    /// `<created>: [<severity>] <cause>: <description>`, one line per fault
    pub fn write_lines<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for fault in &self.faults {
            writeln!(out, "{}", fault)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.faults)
    }
}
