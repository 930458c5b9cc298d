// Snapshot extraction: heatmap payload -> per-year maxima and all-time maximum.
// Pure apart from reading the payload file; persisting the result is the caller's job.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CycleError, PayloadError};
use crate::models::{HeatmapPayload, HeatmapSeries, PeakLocation, SeriesSummary, SnapshotSummary};
use tracing::{debug, instrument, warn};

/// A series needs strictly more finite samples than this to yield a maximum.
pub const MIN_FINITE_SAMPLES: usize = 10;

/// Parses the payload bytes; shape mismatches are reported, never papered over.
pub fn parse_payload(bytes: &[u8]) -> Result<HeatmapPayload, PayloadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Maximum of one series, or `None` when it has `MIN_FINITE_SAMPLES` or fewer finite values.
pub fn summarize_series(
    index: usize,
    series: &HeatmapSeries,
) -> Result<SeriesSummary, PayloadError> {
    let (Some(year), Some(depth)) = (series.year(), series.depth()) else {
        return Err(PayloadError::BlankSeriesName { index });
    };

    let finite: Vec<f64> = series
        .values
        .flatten()
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();

    let max_value = if finite.len() > MIN_FINITE_SAMPLES {
        Some(finite.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    } else {
        None
    };

    Ok(SeriesSummary {
        year: year.to_string(),
        depth: depth.to_string(),
        max_value,
    })
}

/// Builds the snapshot for one run. Same payload in, same maxima out.
pub fn extract(payload: &HeatmapPayload, created_at: i64) -> Result<SnapshotSummary, PayloadError> {
    if payload.data.is_empty() {
        warn!(operation = "extract", "payload has no series");
    }

    // year -> (max, depth of the series that wrote the slot)
    let mut by_year: BTreeMap<String, (Option<f64>, String)> = BTreeMap::new();
    for (index, series) in payload.data.iter().enumerate() {
        let summary = summarize_series(index, series)?;
        if let Some((previous, previous_depth)) = by_year.get(&summary.year) {
            debug!(
                year = %summary.year,
                previous_depth = %previous_depth,
                previous_max = ?previous,
                depth = %summary.depth,
                "year slot overwritten by later series"
            );
        }
        by_year.insert(summary.year, (summary.max_value, summary.depth));
    }

    let mut all_time_max: Option<f64> = None;
    let mut peak: Option<PeakLocation> = None;
    for (year, (max_value, depth)) in &by_year {
        let Some(v) = *max_value else { continue };
        if all_time_max.is_none_or(|best| v > best) {
            all_time_max = Some(v);
            peak = Some(PeakLocation {
                year: year.clone(),
                depth: depth.clone(),
            });
        }
    }

    Ok(SnapshotSummary {
        created_at,
        max_temp_by_year: by_year.into_iter().map(|(y, (v, _))| (y, v)).collect(),
        all_time_max,
        peak,
    })
}

/// Reads, validates and summarizes the payload at `path`.
#[instrument(skip_all, fields(operation = "extract_file", path = %path.display()))]
pub async fn extract_file(path: &Path, created_at: i64) -> Result<SnapshotSummary, CycleError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CycleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let malformed = |source| CycleError::MalformedInput {
        path: path.to_path_buf(),
        source,
    };
    let payload = parse_payload(&bytes).map_err(malformed)?;
    let summary = extract(&payload, created_at).map_err(malformed)?;
    debug!(
        series = payload.data.len(),
        years = summary.max_temp_by_year.len(),
        all_time_max = ?summary.all_time_max,
        "payload summarized"
    );
    Ok(summary)
}
