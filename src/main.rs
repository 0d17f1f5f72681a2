//! # ucs-faults CLI
//!
//! Print the active faults of a UCS domain or standalone C-series controller,
//! trying each known address of the device until one accepts a login.
//!
//! ```bash
//! ucs-faults 10.1.1.1
//! ucs-faults --severity critical --type cimc --alternate 10.1.1.12 cimc-01
//! ucs-faults --config ./creds.ini --json ucs-a.example.com
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ucs_faults::constants::DEFAULT_CONFIG_PATH;
use ucs_faults::core::DnsResolver;
use ucs_faults::logger;
use ucs_faults::platform::{load_config, XmlApiConnector};
use ucs_faults::{
    CredentialResolver, FailoverClient, FaultQueryError, FaultReport, ResolveRequest, Severity,
};

/// Get a list of current UCS device faults.
#[derive(Debug, Parser)]
#[command(name = "ucs-faults", version)]
struct Cli {
    /// Configuration file containing UCS credentials
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Severity level to use as a filter [critical, major, minor, warning, info]
    #[arg(long)]
    severity: Option<String>,

    /// Backend type (ucsm or cimc); overrides the configuration file
    #[arg(long = "type", value_name = "TYPE")]
    backend: Option<String>,

    /// Alternate address to try if the host is unreachable (repeatable);
    /// replaces the configured alternates
    #[arg(short = 'a', long = "alternate", value_name = "ADDR")]
    alternates: Vec<String>,

    /// Print faults as a JSON array
    #[arg(long)]
    json: bool,

    /// Verify the endpoint's TLS certificate
    #[arg(long)]
    verify_tls: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// IP address or hostname of the UCS device
    host: String,
}

async fn run(cli: &Cli) -> Result<FaultReport, FaultQueryError> {
    let config = load_config(&cli.config)?;

    // Reject a bad filter before any network activity
    let filter = Severity::parse_filter(cli.severity.as_deref())?;

    let resolved = CredentialResolver::new(config).resolve(&ResolveRequest {
        host: cli.host.clone(),
        backend: cli.backend.clone(),
        alternates: cli.alternates.clone(),
    })?;

    let client = FailoverClient::new(DnsResolver, XmlApiConnector::new(cli.verify_tls));
    client
        .run(&resolved.identity, &resolved.credentials, filter)
        .await
}

fn print_report(report: &FaultReport, json: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        let rendered = report.to_json().map_err(io::Error::other)?;
        writeln!(out, "{}", rendered)?;
    } else {
        report.write_lines(&mut out)?;
    }
    out.flush()
}

fn report_error(err: &FaultQueryError) {
    match err {
        FaultQueryError::AllCandidatesFailed(failure) => {
            eprintln!("{}", failure);
            for detail in failure.errors() {
                eprintln!("{}", detail);
            }
        }
        other => eprintln!("{}", other),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    match run(&cli).await {
        Ok(report) => {
            for failed in report.failed_attempts() {
                tracing::warn!(error = %failed, "failed over past candidate");
            }
            tracing::info!(
                address = report.address(),
                backend = %report.backend(),
                attempts = report.attempts().len(),
                faults = report.faults().len(),
                "faults retrieved"
            );
            if let Err(e) = print_report(&report, cli.json) {
                eprintln!("Failed to write output: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}
