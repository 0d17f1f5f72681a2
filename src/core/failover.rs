//! Address failover loop
//!
//! Tries each validated candidate in order, one at a time. The first candidate
//! that accepts a login ends the search: its query result (or query error) is
//! the result of the run. Connect failures are collected and only reported if
//! every candidate fails.

use super::report::FaultReport;
use super::session::{ApiConnector, BackendSession};
use super::validation::{AddressValidator, HostResolver};
use crate::models::{AttemptOutcome, ConnectionAttempt, Credentials, Severity, TargetIdentity};
use crate::utils::{AggregatedFailure, FaultQueryError, SessionError};

/// Connects to the first reachable candidate and runs the fault query
pub struct FailoverClient<R, C> {
    validator: AddressValidator<R>,
    connector: C,
}

impl<R: HostResolver, C: ApiConnector> FailoverClient<R, C> {
    pub fn new(resolver: R, connector: C) -> Self {
        Self {
            validator: AddressValidator::new(resolver),
            connector,
        }
    }

    /// Query active faults for `target`, failing over across its addresses
    ///
    /// # Errors
    /// * `NoValidAddress` - no candidate resolved; nothing was attempted
    /// * `Query` - a candidate connected but the query failed (not retried)
    /// * `AllCandidatesFailed` - every candidate failed to connect
    pub async fn run(
        &self,
        target: &TargetIdentity,
        credentials: &Credentials,
        filter: Option<Severity>,
    ) -> Result<FaultReport, FaultQueryError> {
        let candidates = self.validator.validate(target.candidates()).await?;

        let mut attempts: Vec<ConnectionAttempt> = Vec::with_capacity(candidates.len());

        for address in candidates {
            tracing::debug!(%address, backend = %target.backend, "attempting candidate");

            let api = match self.connector.open(&address, target.backend) {
                Ok(api) => api,
                Err(e) => {
                    let err = SessionError::Connect {
                        address: address.clone(),
                        message: e.to_string(),
                    };
                    tracing::warn!(error = %err, "candidate failed");
                    attempts.push(ConnectionAttempt::failed(err));
                    continue;
                }
            };

            let mut backend_session = BackendSession::open(target.backend, &address, api);
            let session = backend_session.as_session_mut();

            if let Err(err) = session.connect(credentials).await {
                tracing::warn!(error = %err, "candidate failed");
                attempts.push(ConnectionAttempt::failed(err));
                continue;
            }

            tracing::info!(
                address = session.address(),
                backend = %session.backend(),
                "connected"
            );
            attempts.push(ConnectionAttempt::connected(address.as_str()));

            let result = session.query_faults(filter).await;
            session.disconnect().await;

            let faults = result.map_err(FaultQueryError::Query)?;
            tracing::info!(%address, count = faults.len(), "fault query complete");
            return Ok(FaultReport::new(address, target.backend, faults, attempts));
        }

        let errors = attempts
            .into_iter()
            .filter_map(|attempt| match attempt.outcome {
                AttemptOutcome::Failed(err) => Some(err),
                AttemptOutcome::Connected => None,
            })
            .collect();
        Err(AggregatedFailure::new(errors).into())
    }
}
