// Shared test helpers
#![allow(dead_code)]

use async_trait::async_trait;
use heatwatch::models::SnapshotSummary;
use heatwatch::notify::{ChannelError, NotifyChannel, NotifyEvent};
use heatwatch::snapshot_repo::SnapshotRepo;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tempfile::TempDir;

/// A heatmap trace with 12 finite samples peaking at `max` plus a few gaps.
pub fn dense_series(name: &str, max: f64) -> serde_json::Value {
    let mut row: Vec<serde_json::Value> = (0..11)
        .map(|i| json!(max - 1.0 - i as f64 * 0.1))
        .collect();
    row.push(json!(max));
    row.push(serde_json::Value::Null);
    json!({ "name": name, "x": [], "y": [], "z": [row, [null, null]] })
}

/// A heatmap trace without enough samples to count.
pub fn sparse_series(name: &str) -> serde_json::Value {
    json!({ "name": name, "z": [[1.0, 2.0, null], [null, 3.0, 99.0]] })
}

pub fn payload_json(series: Vec<serde_json::Value>) -> String {
    json!({ "data": series, "layout": { "title": "MAI090" } }).to_string()
}

pub fn summary(created_at: i64, all_time_max: Option<f64>) -> SnapshotSummary {
    let mut max_temp_by_year = BTreeMap::new();
    max_temp_by_year.insert("2024".to_string(), all_time_max);
    SnapshotSummary {
        created_at,
        max_temp_by_year,
        all_time_max,
        peak: None,
    }
}

pub async fn temp_repo() -> (TempDir, SnapshotRepo) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshots.db");
    let repo = SnapshotRepo::connect(path.to_str().unwrap(), 0)
        .await
        .unwrap();
    repo.init().await.unwrap();
    (dir, repo)
}

/// Channel that remembers every event it was asked to send.
#[derive(Default)]
pub struct RecordingChannel {
    pub events: Mutex<Vec<NotifyEvent>>,
}

#[async_trait]
impl NotifyChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Channel whose transport is always down.
pub struct FailingChannel;

#[async_trait]
impl NotifyChannel for FailingChannel {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn send(&self, _event: &NotifyEvent) -> Result<(), ChannelError> {
        Err(ChannelError::Status {
            status: 503,
            body: "relay unavailable".to_string(),
        })
    }
}
