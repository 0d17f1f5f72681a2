//! Candidate address validation
//!
//! Filters the primary and alternate addresses down to the ones that resolve,
//! keeping their order.

use crate::normalize::{dedupe_candidates, split_host_port};
use crate::utils::ResolveError;

/// Name resolution used to decide whether a candidate is worth attempting
#[async_trait::async_trait]
pub trait HostResolver: Send + Sync {
    /// `Ok(())` if `host` resolves to at least one address
    async fn resolve(&self, host: &str, port: u16) -> Result<(), String>;
}

/// System resolver (getaddrinfo via tokio)
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsResolver;

#[async_trait::async_trait]
impl HostResolver for DnsResolver {
    async fn resolve(&self, host: &str, port: u16) -> Result<(), String> {
        let mut addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| e.to_string())?;
        match addrs.next() {
            Some(_) => Ok(()),
            None => Err("no addresses returned".to_string()),
        }
    }
}

/// Keeps the resolvable subset of a candidate list
pub struct AddressValidator<R> {
    resolver: R,
}

impl<R: HostResolver> AddressValidator<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Resolvable candidates, in the order given
    ///
    /// Duplicates are tried once. Every candidate is checked; an unresolvable
    /// one is logged and skipped. Fails only when none resolve, carrying the
    /// candidate list exactly as supplied.
    pub async fn validate<'a, I>(&self, candidates: I) -> Result<Vec<String>, ResolveError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let supplied: Vec<String> = candidates.into_iter().map(str::to_string).collect();
        let unique = dedupe_candidates(&supplied);

        let mut valid = Vec::with_capacity(unique.len());
        for candidate in unique {
            let (host, port) = split_host_port(&candidate);
            match self.resolver.resolve(&host, port).await {
                Ok(()) => valid.push(candidate),
                Err(e) => {
                    tracing::warn!(
                        address = %candidate,
                        error = %e,
                        "skipping unresolvable address"
                    );
                }
            }
        }

        if valid.is_empty() {
            return Err(ResolveError::NoValidAddress { rejected: supplied });
        }

        tracing::debug!(valid = ?valid, "candidate addresses");
        Ok(valid)
    }
}
