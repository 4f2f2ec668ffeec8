//! Record reconciliation
//!
//! The Reconciler is responsible for:
//! - Fetching the zone's current records (once per run)
//! - Matching each desired name against them
//! - Updating only the records whose address differs
//! - Reporting one outcome per desired name
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐   address    ┌──────────────┐   list / update   ┌─────────────┐
//! │ IpResolver  │─────────────▶│  Reconciler  │──────────────────▶│ DnsProvider │
//! └─────────────┘              └──────────────┘                   └─────────────┘
//!                                     │
//!                                     ▼
//!                             ReconcileReport
//! ```
//!
//! ## Per-name decision
//!
//! 1. No record with that exact name → `NotFound` (warning, run continues)
//! 2. Record content equals the resolved address → `UpToDate` (no provider call)
//! 3. Otherwise → update with new content, derived type and comment → `Updated`
//! 4. Update failure → aborts the run, or `Failed` under [`UpdateFailurePolicy::Continue`]
//!
//! There is no rollback: updates applied before an abort stay applied.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{ApiError, Error, Result};
use crate::record::{DnsRecord, ResolvedIp};
use crate::traits::{DnsProvider, IpResolver};

/// What to do when a record update fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateFailurePolicy {
    /// Stop at the first failed update and return an error
    #[default]
    AbortRun,
    /// Record the failure for that name and keep going
    Continue,
}

/// Result of reconciling a single record name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Record already points at the resolved address
    UpToDate {
        address: String,
    },
    /// Record was updated
    Updated {
        previous: String,
        current: String,
    },
    /// No record with this name exists in the zone
    NotFound,
    /// Update failed (only reported under [`UpdateFailurePolicy::Continue`])
    Failed {
        previous: String,
        attempted: String,
        message: String,
        errors: Vec<ApiError>,
    },
}

/// Outcome for one desired record name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub name: String,
    pub outcome: RecordOutcome,
}

/// Aggregated result of a reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// One entry per desired name, in request order
    pub records: Vec<RecordReport>,
    /// Non-fatal problems (unknown record names)
    pub warnings: Vec<String>,
}

impl ReconcileReport {
    /// Outcome for a given name
    pub fn outcome(&self, name: &str) -> Option<&RecordOutcome> {
        self.records
            .iter()
            .find(|report| report.name == name)
            .map(|report| &report.outcome)
    }

    pub fn updated_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::Updated { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.records
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// Default comment attached to updated records: `Updated YYYY-MM-DDTHH:MM:SS` (UTC)
pub fn default_comment() -> String {
    format!("Updated {}", Utc::now().format("%Y-%m-%dT%H:%M:%S"))
}

/// Diffs desired record names against a zone and applies the minimal update set
///
/// ## Threading
///
/// All provider calls are made sequentially from the calling task: one list
/// call, then at most one update call per desired name.
pub struct Reconciler {
    /// DNS provider for listing and updating records
    provider: Box<dyn DnsProvider>,

    /// Zone holding the records
    zone_id: String,

    /// Comment for updated records; `None` uses [`default_comment`] at run time
    comment: Option<String>,

    /// Behavior on update failure
    failure_policy: UpdateFailurePolicy,
}

impl Reconciler {
    /// Create a reconciler for one zone
    pub fn new(provider: Box<dyn DnsProvider>, zone_id: impl Into<String>) -> Self {
        Self {
            provider,
            zone_id: zone_id.into(),
            comment: None,
            failure_policy: UpdateFailurePolicy::default(),
        }
    }

    /// Use a fixed comment for updated records
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the update failure policy
    pub fn with_failure_policy(mut self, policy: UpdateFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Underlying provider
    pub fn provider(&self) -> &dyn DnsProvider {
        self.provider.as_ref()
    }

    /// Resolve the public address once, then reconcile toward it
    pub async fn resolve_and_reconcile(
        &self,
        resolver: &dyn IpResolver,
        desired_names: &[String],
    ) -> Result<(ResolvedIp, ReconcileReport)> {
        let resolved = ResolvedIp::new(resolver.resolve().await?);
        info!("Resolved public IP: {}", resolved);

        let report = self.reconcile(desired_names, &resolved).await?;
        Ok((resolved, report))
    }

    /// Reconcile the desired names toward `resolved`
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: One outcome per desired name
    /// - `Err(Error)`: Listing failed, or an update failed under
    ///   [`UpdateFailurePolicy::AbortRun`] ([`Error::UpdateFailed`] carries
    ///   the outcomes completed so far)
    pub async fn reconcile(
        &self,
        desired_names: &[String],
        resolved: &ResolvedIp,
    ) -> Result<ReconcileReport> {
        let records = self.provider.list_records(&self.zone_id).await?;
        debug!(
            "Fetched {} record(s) from {} zone {}",
            records.len(),
            self.provider.provider_name(),
            self.zone_id
        );

        let comment = self.comment.clone().unwrap_or_else(default_comment);
        let mut report = ReconcileReport::default();

        for name in unique_names(desired_names) {
            let Some(record) = find_record(&records, name, resolved) else {
                let warning = format!("Could not find DNS record with name \"{name}\".");
                warn!("{}", warning);
                report.warnings.push(warning);
                report.records.push(RecordReport {
                    name: name.to_string(),
                    outcome: RecordOutcome::NotFound,
                });
                continue;
            };

            if record.content == resolved.address {
                info!("IP address for \"{}\" is already up to date.", name);
                report.records.push(RecordReport {
                    name: name.to_string(),
                    outcome: RecordOutcome::UpToDate {
                        address: record.content.clone(),
                    },
                });
                continue;
            }

            info!(
                "Updating IP address for \"{}\" from \"{}\" to \"{}\".",
                name, record.content, resolved.address
            );
            let updated = record.retargeted(resolved, comment.as_str());

            let result = self.provider.update_record(&self.zone_id, &updated).await;
            let outcome = match result {
                Ok(()) => {
                    info!("IP address for \"{}\" updated.", name);
                    RecordOutcome::Updated {
                        previous: record.content.clone(),
                        current: updated.content,
                    }
                }
                Err(e) => match self.failure_policy {
                    UpdateFailurePolicy::AbortRun => {
                        warn!("Update of {} failed, aborting run: {}", name, e);
                        return Err(Error::UpdateFailed {
                            record: name.to_string(),
                            previous: record.content.clone(),
                            attempted: updated.content,
                            source: Box::new(e),
                            completed: report.records,
                        });
                    }
                    UpdateFailurePolicy::Continue => {
                        warn!("Update of {} failed, continuing: {}", name, e);
                        RecordOutcome::Failed {
                            previous: record.content.clone(),
                            attempted: updated.content,
                            message: e.to_string(),
                            errors: e.api_errors().to_vec(),
                        }
                    }
                },
            };

            report.records.push(RecordReport {
                name: name.to_string(),
                outcome,
            });
        }

        Ok(report)
    }
}

/// Desired names without blanks or repeats, first occurrence order kept
///
/// Names are kept verbatim; only exact duplicates collapse.
fn unique_names(desired_names: &[String]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::with_capacity(desired_names.len());
    for name in desired_names.iter().map(String::as_str) {
        if !name.trim().is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Record with exactly this name; when several share it, the one already
/// holding the resolved family wins
fn find_record<'a>(
    records: &'a [DnsRecord],
    name: &str,
    resolved: &ResolvedIp,
) -> Option<&'a DnsRecord> {
    let wanted_type = resolved.record_type();
    let mut first = None;

    for record in records.iter().filter(|record| record.name == name) {
        if record.record_type == wanted_type {
            return Some(record);
        }
        if first.is_none() {
            first = Some(record);
        }
    }

    first
}
