//! Logging setup
//!
//! Diagnostics go to stderr so stdout carries only fault lines. `RUST_LOG`
//! wins when set; otherwise `-v` flags pick the level for this crate and
//! everything else stays at `warn`.

use tracing_subscriber::EnvFilter;

/// Set to `1` to force debug logging regardless of `-v`
const VERBOSE_ENV: &str = "UCS_FAULTS_LOG_VERBOSE";

fn default_directives(verbosity: u8, verbose_env: bool) -> String {
    let level = if verbose_env {
        "debug"
    } else {
        match verbosity {
            0 => return "warn".to_string(),
            1 => "info",
            _ => "debug",
        }
    };
    format!("warn,ucs_faults={}", level)
}

pub fn init_logger(verbosity: u8) {
    let verbose_env = std::env::var(VERBOSE_ENV)
        .map(|v| v == "1")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity, verbose_env)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(0, false), "warn");
        assert_eq!(default_directives(1, false), "warn,ucs_faults=info");
        assert_eq!(default_directives(3, false), "warn,ucs_faults=debug");
        assert_eq!(default_directives(0, true), "warn,ucs_faults=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger(0);
        init_logger(2);
    }
}
