// Snapshot summaries: per-year maxima of one extraction run, plus the stored form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Store-assigned, monotonically increasing identifier of a persisted snapshot.
pub type RecordId = i64;

/// Where the all-time maximum of a snapshot was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakLocation {
    pub year: String,
    pub depth: String,
}

/// Maximum of one heatmap series; `None` when the series is too sparse to trust.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub year: String,
    pub depth: String,
    pub max_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub max_temp_by_year: BTreeMap<String, Option<f64>>,
    pub all_time_max: Option<f64>,
    pub peak: Option<PeakLocation>,
}

impl SnapshotSummary {
    /// Sortable label, `YYYYMMDD_HHMMSS` in UTC.
    pub fn created_label(&self) -> String {
        created_label(self.created_at)
    }
}

/// A snapshot as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSnapshot {
    pub id: RecordId,
    #[serde(flatten)]
    pub summary: SnapshotSummary,
}

impl StoredSnapshot {
    pub fn created_at(&self) -> i64 {
        self.summary.created_at
    }
}

pub fn created_label(created_at_ms: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(created_at_ms) {
        Some(t) => t.format("%Y%m%d_%H%M%S").to_string(),
        None => created_at_ms.to_string(),
    }
}
