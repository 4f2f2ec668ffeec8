// # cloudflare-dyndns
//
// Keeps Cloudflare DNS records pointed at the current public IP.
//
// This binary is a THIN integration layer:
// - parses the command line
// - locates and validates the config file
// - installs logging
// - wires the HTTP transports into the core reconciler
// - renders outcomes to the terminal
//
// All decision logic (record matching, update diffing, retry) lives in
// dyndns-core.
//
// ## Example
//
// ```bash
// cloudflare-dyndns list
// cloudflare-dyndns update
// cloudflare-dyndns update --name home.example.com --ip 1.2.3.4
// cloudflare-dyndns ip
// ```

mod cli;
mod commands;
mod config;
mod gateway;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::cli::Cli;

/// Exit codes for different termination scenarios
///
/// - 0: Success (also when the home gateway check skips the run)
/// - 1: Configuration error or rejected provider request
/// - 2: Runtime error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DyndnsExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DyndnsExitCode> for ExitCode {
    fn from(code: DyndnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Exit code for a failed command
///
/// A provider rejection usually means a wrong token or zone id, so it is
/// reported like a configuration problem.
fn exit_code_for(err: &anyhow::Error) -> DyndnsExitCode {
    match err.downcast_ref::<dyndns_core::Error>() {
        Some(dyndns_core::Error::Config(_) | dyndns_core::Error::Api { .. }) => {
            DyndnsExitCode::ConfigError
        }
        _ => DyndnsExitCode::RuntimeError,
    }
}

/// Core error behind a cause in an error chain (boxed sources included)
fn as_core_error<'a>(
    cause: &'a (dyn std::error::Error + 'static),
) -> Option<&'a dyndns_core::Error> {
    cause.downcast_ref::<dyndns_core::Error>().or_else(|| {
        cause
            .downcast_ref::<Box<dyndns_core::Error>>()
            .map(|boxed| boxed.as_ref())
    })
}

/// Error lines for the terminal
///
/// Provider error entries get a line each as `message (code: N)`; the
/// causes above them are joined into the headline.
fn error_lines(err: &anyhow::Error) -> Vec<String> {
    let mut headline = Vec::new();
    let mut api_errors = Vec::new();

    for cause in err.chain() {
        if let Some(dyndns_core::Error::Api { errors }) = as_core_error(cause) {
            if headline.is_empty() {
                headline.push("Provider rejected the request".to_string());
            }
            api_errors = errors.iter().map(ToString::to_string).collect();
            break;
        }
        headline.push(cause.to_string());
    }

    let mut lines = vec![format!("Error: {}", headline.join(": "))];
    lines.extend(api_errors);
    lines
}

fn report_error(err: &anyhow::Error) {
    error!("{:#}", err);
    for line in error_lines(err) {
        output::error(line);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load and validate configuration
    let (config_path, config) = match config::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            output::error(format!("Error: {e}"));
            return DyndnsExitCode::ConfigError.into();
        }
    };

    // Held until exit so buffered log lines are flushed
    let _log_guard = match logging::init(&config.main.log_file_path) {
        Ok(guard) => guard,
        Err(e) => {
            output::error(format!("Error: {e:#}"));
            return DyndnsExitCode::ConfigError.into();
        }
    };

    info!("Using config file: {}", config_path.display());
    tracing::debug!("Configuration: {:?}", config);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            output::error(format!("Error: Failed to create tokio runtime: {e}"));
            return DyndnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(commands::dispatch(cli.command, &config));

    match result {
        Ok(()) => DyndnsExitCode::Success.into(),
        Err(e) => {
            report_error(&e);
            exit_code_for(&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use dyndns_core::{ApiError, Error};

    #[test]
    fn rejection_lists_each_provider_error() {
        let err = Err::<(), _>(Error::api(vec![
            ApiError::new(1001, "Invalid zone identifier"),
            ApiError::new(10000, "Authentication error"),
        ]))
        .context("Failed to get DNS records")
        .unwrap_err();

        assert_eq!(
            error_lines(&err),
            vec![
                "Error: Failed to get DNS records".to_string(),
                "Invalid zone identifier (code: 1001)".to_string(),
                "Authentication error (code: 10000)".to_string(),
            ]
        );
        assert_eq!(exit_code_for(&err), DyndnsExitCode::ConfigError);
    }

    #[test]
    fn aborted_update_names_the_record() {
        let err = Err::<(), _>(Error::UpdateFailed {
            record: "home.example.com".to_string(),
            previous: "1.1.1.1".to_string(),
            attempted: "2.2.2.2".to_string(),
            source: Box::new(Error::api(vec![ApiError::new(9005, "Content is invalid")])),
            completed: Vec::new(),
        })
        .context("Failed to update DNS records")
        .unwrap_err();

        assert_eq!(
            error_lines(&err),
            vec![
                "Error: Failed to update DNS records: Failed to update DNS record home.example.com"
                    .to_string(),
                "Content is invalid (code: 9005)".to_string(),
            ]
        );
        assert_eq!(exit_code_for(&err), DyndnsExitCode::RuntimeError);
    }

    #[test]
    fn transport_failure_is_runtime_error() {
        let err = Err::<(), _>(Error::transport("connection refused"))
            .context("Failed to get DNS records")
            .unwrap_err();

        assert_eq!(
            error_lines(&err),
            vec!["Error: Failed to get DNS records: Transport error: connection refused".to_string()]
        );
        assert_eq!(exit_code_for(&err), DyndnsExitCode::RuntimeError);
    }

    #[test]
    fn bare_rejection_gets_a_headline() {
        let err = anyhow::Error::new(Error::api(vec![ApiError::new(9109, "Unauthorized")]));

        assert_eq!(
            error_lines(&err),
            vec![
                "Error: Provider rejected the request".to_string(),
                "Unauthorized (code: 9109)".to_string(),
            ]
        );
    }

    #[test]
    fn exit_codes_match_process_contract() {
        assert_eq!(DyndnsExitCode::Success as u8, 0);
        assert_eq!(DyndnsExitCode::ConfigError as u8, 1);
        assert_eq!(DyndnsExitCode::RuntimeError as u8, 2);
    }
}
