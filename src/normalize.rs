//! Input normalisation helpers for host names and address lists.
//!
//! Every user-supplied address passes through one of these functions before
//! it reaches the resolver or a session, so candidates compare equal no matter
//! how they were typed.

use std::collections::HashSet;

use crate::constants::DEFAULT_API_PORT;

/// Normalise a host name or address: trim whitespace.
///
/// Returns an error if the resulting name is empty. Case is preserved because
/// the value is also used as a configuration section key.
pub fn normalize_host_name(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Host name cannot be empty".to_string());
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(format!("Host name '{}' contains whitespace", trimmed));
    }
    Ok(trimmed.to_string())
}

/// Parse a whitespace-delimited address list (the `alternates` config value).
///
/// Order is preserved; an empty or blank string yields an empty list.
pub fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Trim, drop blanks and remove repeated candidates, keeping first occurrence.
pub fn dedupe_candidates<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();
    for candidate in candidates {
        let Ok(normalized) = normalize_host_name(candidate.as_ref()) else {
            continue;
        };
        if seen.insert(normalized.to_ascii_lowercase()) {
            cleaned.push(normalized);
        }
    }
    cleaned
}

/// Split `host:port` into its parts, defaulting to the API port.
///
/// Bracketed IPv6 (`[fe80::1]:8443`) is supported; a bare IPv6 literal is
/// returned whole with the default port.
pub fn split_host_port(address: &str) -> (String, u16) {
    let address = address.trim();

    if let Some(rest) = address.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = tail
                .strip_prefix(':')
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_API_PORT);
            return (host.to_string(), port);
        }
    }

    if address.matches(':').count() == 1 {
        if let Some((host, port)) = address.rsplit_once(':') {
            if let Ok(port_num) = port.parse::<u16>() {
                return (host.to_string(), port_num);
            }
        }
    }

    (address.to_string(), DEFAULT_API_PORT)
}
