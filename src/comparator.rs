// Record detection between the two newest snapshots. Pure, no I/O.

use crate::models::{PeakLocation, RecordId, SnapshotSummary, StoredSnapshot};

/// True when `most_recent` has a defined all-time max strictly above `previous`'s,
/// or `previous` has none at all. Ties are not records.
pub fn is_new_record(most_recent: &SnapshotSummary, previous: &SnapshotSummary) -> bool {
    match (most_recent.all_time_max, previous.all_time_max) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(new), Some(old)) => new > old,
    }
}

/// Outcome of comparing the two newest snapshots, with enough context to alert on.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecision {
    pub is_new_record: bool,
    pub most_recent_id: RecordId,
    pub previous_id: RecordId,
    pub new_value: Option<f64>,
    pub previous_value: Option<f64>,
    pub peak: Option<PeakLocation>,
}

pub fn compare(most_recent: &StoredSnapshot, previous: &StoredSnapshot) -> RecordDecision {
    RecordDecision {
        is_new_record: is_new_record(&most_recent.summary, &previous.summary),
        most_recent_id: most_recent.id,
        previous_id: previous.id,
        new_value: most_recent.summary.all_time_max,
        previous_value: previous.summary.all_time_max,
        peak: most_recent.summary.peak.clone(),
    }
}
