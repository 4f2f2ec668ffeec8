//! `update` command handler.
//!
//! Flow: home gateway gate, then the address (`--ip` or the echo service),
//! then one reconciliation run over `--name` or the configured records.

use anyhow::{Context, Result, bail};
use dyndns_core::{
    DyndnsConfig, Error, ReconcileReport, Reconciler, RecordOutcome, RecordReport, ResolvedIp,
    UpdateFailurePolicy,
};
use dyndns_ip_http::HttpIpResolver;
use dyndns_provider_cloudflare::CloudflareClient;
use tracing::info;

use crate::cli::UpdateArgs;
use crate::{gateway, output};

/// A rendered line of command output
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Plain(String),
    Warning(String),
    Error(String),
}

impl Line {
    fn print(&self) {
        match self {
            Self::Plain(text) => output::line(text),
            Self::Warning(text) => output::warning(text),
            Self::Error(text) => output::error(text),
        }
    }
}

fn updating_line(name: &str, previous: &str, attempted: &str) -> Line {
    Line::Plain(format!(
        "Updating IP address for \"{name}\" from \"{previous}\" to \"{attempted}\"."
    ))
}

fn outcome_lines(report: &RecordReport) -> Vec<Line> {
    let name = &report.name;
    match &report.outcome {
        RecordOutcome::UpToDate { .. } => vec![Line::Plain(format!(
            "IP address for \"{name}\" is already up to date."
        ))],
        RecordOutcome::Updated { previous, current } => vec![
            updating_line(name, previous, current),
            Line::Plain(format!("IP address for \"{name}\" updated.")),
        ],
        RecordOutcome::NotFound => vec![Line::Warning(format!(
            "Could not find DNS record with name \"{name}\"."
        ))],
        RecordOutcome::Failed {
            previous,
            attempted,
            message,
            errors,
        } => {
            let mut lines = vec![
                updating_line(name, previous, attempted),
                Line::Error(format!("Failed to update DNS record \"{name}\": {message}")),
            ];
            lines.extend(errors.iter().map(|error| Line::Error(error.to_string())));
            lines
        }
    }
}

/// Lines for an aborted run: finished records, then the attempted change
///
/// The failure itself is reported by the top-level error handler.
fn aborted_lines(err: &Error) -> Vec<Line> {
    let Error::UpdateFailed {
        record,
        previous,
        attempted,
        completed,
        ..
    } = err
    else {
        return Vec::new();
    };

    let mut lines: Vec<Line> = completed.iter().flat_map(outcome_lines).collect();
    lines.push(updating_line(record, previous, attempted));
    lines
}

fn print_reports(reports: &[RecordReport]) {
    reports
        .iter()
        .flat_map(outcome_lines)
        .for_each(|line| line.print());
}

/// Names to reconcile: `--name` alone, or every configured record
///
/// A blank `--name` counts as not given.
fn desired_names(config: &DyndnsConfig, name: Option<String>) -> Vec<String> {
    match non_blank(name) {
        Some(name) => vec![name],
        None => config.cloudflare.update_records.clone(),
    }
}

/// Address from `--ip`; `None` (blank included) means ask the echo service
fn override_address(ip: Option<String>) -> Option<ResolvedIp> {
    non_blank(ip).map(ResolvedIp::new)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn failure_policy(keep_going: bool) -> UpdateFailurePolicy {
    if keep_going {
        UpdateFailurePolicy::Continue
    } else {
        UpdateFailurePolicy::AbortRun
    }
}

/// `false` when a home gateway is configured and this host sits behind another one
fn on_home_network(config: &DyndnsConfig) -> Result<bool> {
    let Some(home) = config.main.home_gateway() else {
        return Ok(true);
    };

    let current = gateway::discover().context("Failed to discover the default gateway")?;
    if gateway::is_home(home, current) {
        return Ok(true);
    }

    info!(
        "current gateway {} does not match home gateway {}",
        current, home
    );
    output::warning(format!(
        "Warning: Your current gateway ({current}) does not match your home gateway ({home}). Exiting."
    ));
    Ok(false)
}

pub async fn handle(config: &DyndnsConfig, args: UpdateArgs) -> Result<()> {
    if !on_home_network(config)? {
        return Ok(());
    }

    let client = CloudflareClient::new(config)?;
    let mut reconciler = Reconciler::new(Box::new(client), config.cloudflare.zone_id.clone())
        .with_failure_policy(failure_policy(args.keep_going));
    if let Some(comment) = args.comment {
        reconciler = reconciler.with_comment(comment);
    }

    let names = desired_names(config, args.name);
    let result = match override_address(args.ip) {
        Some(resolved) => reconciler.reconcile(&names, &resolved).await,
        None => {
            let resolver = HttpIpResolver::new(config)?;
            reconciler
                .resolve_and_reconcile(&resolver, &names)
                .await
                .map(|(_, report)| report)
        }
    };

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            aborted_lines(&err).iter().for_each(Line::print);
            return Err(err).context("Failed to update DNS records");
        }
    };

    print_reports(&report.records);
    summarize(&report)
}

fn summarize(report: &ReconcileReport) -> Result<()> {
    info!(
        "{} record(s) updated, {} failed, {} warning(s)",
        report.updated_count(),
        report.failed_count(),
        report.warnings.len()
    );

    let failed = report.failed_count();
    if failed > 0 {
        bail!("{failed} DNS record update(s) failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyndns_core::ApiError;

    fn report(name: &str, outcome: RecordOutcome) -> RecordReport {
        RecordReport {
            name: name.to_string(),
            outcome,
        }
    }

    #[test]
    fn updated_prints_both_lines() {
        let lines = outcome_lines(&report(
            "home.example.com",
            RecordOutcome::Updated {
                previous: "1.1.1.1".into(),
                current: "2.2.2.2".into(),
            },
        ));

        assert_eq!(
            lines,
            vec![
                Line::Plain(
                    "Updating IP address for \"home.example.com\" from \"1.1.1.1\" to \"2.2.2.2\"."
                        .into()
                ),
                Line::Plain("IP address for \"home.example.com\" updated.".into()),
            ]
        );
    }

    #[test]
    fn up_to_date_and_not_found_lines() {
        assert_eq!(
            outcome_lines(&report(
                "home.example.com",
                RecordOutcome::UpToDate {
                    address: "1.1.1.1".into()
                }
            )),
            vec![Line::Plain(
                "IP address for \"home.example.com\" is already up to date.".into()
            )]
        );
        assert_eq!(
            outcome_lines(&report("missing.example.com", RecordOutcome::NotFound)),
            vec![Line::Warning(
                "Could not find DNS record with name \"missing.example.com\".".into()
            )]
        );
    }

    #[test]
    fn failed_lists_provider_errors() {
        let lines = outcome_lines(&report(
            "home.example.com",
            RecordOutcome::Failed {
                previous: "1.1.1.1".into(),
                attempted: "2.2.2.2".into(),
                message: "Provider rejected the request".into(),
                errors: vec![ApiError::new(9005, "Content for A record is invalid")],
            },
        ));

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            Line::Plain(
                "Updating IP address for \"home.example.com\" from \"1.1.1.1\" to \"2.2.2.2\"."
                    .into()
            )
        );
        assert_eq!(
            lines[2],
            Line::Error("Content for A record is invalid (code: 9005)".into())
        );
    }

    #[test]
    fn aborted_run_shows_attempted_change() {
        let err = Error::UpdateFailed {
            record: "b.example.com".into(),
            previous: "1.1.1.1".into(),
            attempted: "2.2.2.2".into(),
            source: Box::new(Error::api(vec![ApiError::new(9005, "Content is invalid")])),
            completed: vec![report(
                "a.example.com",
                RecordOutcome::UpToDate {
                    address: "2.2.2.2".into(),
                },
            )],
        };

        assert_eq!(
            aborted_lines(&err),
            vec![
                Line::Plain("IP address for \"a.example.com\" is already up to date.".into()),
                Line::Plain(
                    "Updating IP address for \"b.example.com\" from \"1.1.1.1\" to \"2.2.2.2\"."
                        .into()
                ),
            ]
        );
        assert!(aborted_lines(&Error::transport("connection refused")).is_empty());
    }

    #[test]
    fn name_flag_replaces_configured_records() {
        let mut config = DyndnsConfig::default();
        config.cloudflare.update_records = vec!["a.example.com".into(), "b.example.com".into()];

        assert_eq!(desired_names(&config, None), config.cloudflare.update_records);
        assert_eq!(
            desired_names(&config, Some("c.example.com".into())),
            vec!["c.example.com".to_string()]
        );
    }

    #[test]
    fn blank_name_flag_uses_configured_records() {
        let mut config = DyndnsConfig::default();
        config.cloudflare.update_records = vec!["a.example.com".into()];

        assert_eq!(
            desired_names(&config, Some(String::new())),
            vec!["a.example.com".to_string()]
        );
        assert_eq!(
            desired_names(&config, Some("  ".into())),
            vec!["a.example.com".to_string()]
        );
    }

    #[test]
    fn blank_ip_flag_falls_back_to_echo_service() {
        assert_eq!(override_address(None), None);
        assert_eq!(override_address(Some(String::new())), None);
        assert_eq!(override_address(Some(" ".into())), None);
        assert_eq!(
            override_address(Some("1.2.3.4".into())),
            Some(ResolvedIp::new("1.2.3.4"))
        );
    }

    #[test]
    fn keep_going_selects_continue_policy() {
        assert_eq!(failure_policy(false), UpdateFailurePolicy::AbortRun);
        assert_eq!(failure_policy(true), UpdateFailurePolicy::Continue);
    }

    #[test]
    fn no_home_gateway_skips_discovery() {
        let config = DyndnsConfig::default();
        assert!(on_home_network(&config).unwrap());
    }

    #[test]
    fn failed_updates_fail_the_command() {
        let report = ReconcileReport {
            records: vec![report(
                "home.example.com",
                RecordOutcome::Failed {
                    previous: "1.1.1.1".into(),
                    attempted: "2.2.2.2".into(),
                    message: "Transport error".into(),
                    errors: Vec::new(),
                },
            )],
            warnings: Vec::new(),
        };

        assert!(summarize(&report).is_err());
        assert!(summarize(&ReconcileReport::default()).is_ok());
    }
}
