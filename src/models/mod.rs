// Domain models: upstream heatmap payload and persisted snapshot summaries

mod payload;
mod snapshot;

pub use payload::{HeatmapPayload, HeatmapSeries, Samples};
pub use snapshot::{
    PeakLocation, RecordId, SeriesSummary, SnapshotSummary, StoredSnapshot, created_label,
};
