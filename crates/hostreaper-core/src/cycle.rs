//! One cleanup pass over the removal pipeline

use chrono::{DateTime, Utc};
use hostreaper_api::Host;
use hostreaper_client::HostApi;
use tracing::{debug, info, instrument, warn};

use crate::error::CoreError;
use crate::stage::Stage;

/// A host whose action request was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFailure {
    /// Host id
    pub host: String,
    /// Rendered client error
    pub error: String,
}

/// Outcome of a single stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    /// Reconnecting hosts returned by the stage's list query
    pub matched: usize,
    /// Ids of hosts whose action was accepted, in request order
    pub succeeded: Vec<String>,
    pub failed: Vec<HostFailure>,
}

impl StageReport {
    fn new(stage: Stage, matched: usize) -> Self {
        Self {
            stage,
            matched,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Every matched host was acted on successfully
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of a full cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One entry per stage, in run order
    pub stages: Vec<StageReport>,
}

impl CycleReport {
    /// Report for `stage`
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    /// Number of action requests issued
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.stages
            .iter()
            .map(|r| r.succeeded.len() + r.failed.len())
            .sum()
    }

    /// Number of action requests that failed
    #[must_use]
    pub fn failures(&self) -> usize {
        self.stages.iter().map(|r| r.failed.len()).sum()
    }

    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Run deactivate, remove and purge in order
///
/// # Errors
/// Returns [`CoreError::ListFailed`] as soon as a stage cannot list its
/// hosts. Later stages do not run.
#[instrument(skip(api), level = "debug")]
pub async fn run_cycle(api: &dyn HostApi) -> Result<CycleReport, CoreError> {
    let started_at = Utc::now();

    let mut stages = Vec::with_capacity(Stage::ALL.len());
    for stage in Stage::ALL {
        stages.push(run_stage(api, stage).await?);
    }

    let report = CycleReport {
        started_at,
        finished_at: Utc::now(),
        stages,
    };

    info!(
        attempted = report.attempted(),
        failed = report.failures(),
        elapsed_ms = report.elapsed().num_milliseconds(),
        "cleanup cycle complete"
    );
    Ok(report)
}

/// List the stage's hosts and request its action on each one
///
/// Hosts are handled one at a time. A rejected action is logged and
/// recorded; the remaining hosts are still processed.
///
/// # Errors
/// Returns [`CoreError::ListFailed`] if the list query fails.
#[instrument(skip(api), fields(stage = %stage), level = "debug")]
pub async fn run_stage(api: &dyn HostApi, stage: Stage) -> Result<StageReport, CoreError> {
    let hosts = api
        .list_hosts(&stage.filter())
        .await
        .map_err(|source| CoreError::ListFailed { stage, source })?;

    // The filter already asks for reconnecting agents; don't act on anything else
    let (hosts, skipped): (Vec<_>, Vec<_>) = hosts.into_iter().partition(Host::is_reconnecting);
    for host in &skipped {
        debug!(
            host = %host.id,
            agent_state = ?host.agent_state,
            "skipping host whose agent is not reconnecting"
        );
    }

    let mut report = StageReport::new(stage, hosts.len());

    for host in &hosts {
        match api.perform(host, stage.action()).await {
            Ok(()) => {
                info!(
                    host = %host.id,
                    label = host.display_name(),
                    "{} host: {}",
                    stage.past_tense(),
                    host.id
                );
                report.succeeded.push(host.id.clone());
            }
            Err(err) => {
                warn!(
                    host = %host.id,
                    label = host.display_name(),
                    error = %err,
                    "Unable to {}: {}",
                    stage.failure_subject(),
                    host.id
                );
                report.failed.push(HostFailure {
                    host: host.id.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    info!(
        matched = report.matched,
        failed = report.failed.len(),
        "{} {} hosts",
        stage.past_tense(),
        report.succeeded.len()
    );
    Ok(report)
}
