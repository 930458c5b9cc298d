// One monitoring cycle: extract -> persist -> compare -> notify.
// Extraction and storage errors abort the cycle; notification errors are only logged.

use std::path::PathBuf;
use std::sync::Arc;

use crate::comparator::{self, RecordDecision};
use crate::config::AppConfig;
use crate::error::CycleError;
use crate::extractor;
use crate::models::{RecordId, SnapshotSummary};
use crate::notify::Notifier;
use crate::snapshot_repo::{LatestTwo, SnapshotRepo};
use tracing::{info, instrument, warn};

/// What the compare step concluded.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Fewer than two snapshots stored; nothing to compare yet.
    InsufficientHistory { count: usize },
    NoRecord(RecordDecision),
    NewRecord {
        decision: RecordDecision,
        delivered: usize,
        failed: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub record_id: RecordId,
    pub summary: SnapshotSummary,
    pub outcome: CheckOutcome,
}

pub struct Cycle {
    repo: Arc<SnapshotRepo>,
    notifier: Arc<Notifier>,
    payload_path: PathBuf,
    location: String,
}

impl Cycle {
    pub fn new(
        repo: Arc<SnapshotRepo>,
        notifier: Arc<Notifier>,
        payload_path: impl Into<PathBuf>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            notifier,
            payload_path: payload_path.into(),
            location: location.into(),
        }
    }

    pub fn from_config(config: &AppConfig, repo: Arc<SnapshotRepo>, notifier: Arc<Notifier>) -> Self {
        Self::new(
            repo,
            notifier,
            &config.source.payload_path,
            config.source.location.clone(),
        )
    }

    /// Step 1: summarize the current payload and append it to the store.
    #[instrument(skip(self), fields(operation = "extract_and_persist"))]
    pub async fn extract_and_persist(&self) -> Result<(RecordId, SnapshotSummary), CycleError> {
        let summary = extractor::extract_file(&self.payload_path, now_ms()).await?;
        let id = self
            .repo
            .append(&summary)
            .await
            .map_err(CycleError::StorageWrite)?;
        info!(
            record_id = id,
            created = %summary.created_label(),
            all_time_max = ?summary.all_time_max,
            years = summary.max_temp_by_year.len(),
            "snapshot stored"
        );
        Ok((id, summary))
    }

    /// Step 2: compare the two newest snapshots and alert on a new record.
    #[instrument(skip(self), fields(operation = "check_and_notify"))]
    pub async fn check_and_notify(&self) -> Result<CheckOutcome, CycleError> {
        let latest = self
            .repo
            .latest_two()
            .await
            .map_err(CycleError::StorageRead)?;
        let (most_recent, previous) = match latest {
            LatestTwo::Pair {
                most_recent,
                previous,
            } => (most_recent, previous),
            LatestTwo::Insufficient { count } => {
                info!(stored = count, "not enough history to compare, skipping");
                return Ok(CheckOutcome::InsufficientHistory { count });
            }
        };

        let decision = comparator::compare(&most_recent, &previous);
        let new_value = match decision.new_value {
            Some(v) if decision.is_new_record => v,
            _ => {
                info!(
                    current = ?decision.new_value,
                    previous = ?decision.previous_value,
                    "no new record"
                );
                return Ok(CheckOutcome::NoRecord(decision));
            }
        };

        let depth_context = decision
            .peak
            .as_ref()
            .map(|p| format!("{} ({})", p.depth, p.year));
        info!(
            new_value,
            previous = ?decision.previous_value,
            peak = ?depth_context,
            "new all-time record"
        );

        let results = self
            .notifier
            .notify_record(
                true,
                new_value,
                decision.previous_value,
                &self.location,
                depth_context.as_deref(),
            )
            .await;
        let mut delivered = 0;
        let mut failed = 0;
        for (channel, result) in results {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    failed += 1;
                    warn!(channel = %channel, error = %e, "notification delivery failed");
                }
            }
        }

        Ok(CheckOutcome::NewRecord {
            decision,
            delivered,
            failed,
        })
    }

    /// Both steps. A failed extraction or append never reaches the compare step.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let (record_id, summary) = self.extract_and_persist().await?;
        let outcome = self.check_and_notify().await?;
        Ok(CycleReport {
            record_id,
            summary,
            outcome,
        })
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
