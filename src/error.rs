// Error types for the extract -> persist -> compare cycle.
// Notification failures have their own type (notify::ChannelError) and never abort a cycle.

use std::path::PathBuf;

use thiserror::Error;

/// Payload could not be turned into a snapshot.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid heatmap JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("series {index} has a blank name; expected \"<year> ... <depth>\"")]
    BlankSeriesName { index: usize },
}

/// Snapshot store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode year maxima: {0}")]
    Encode(String),
}

/// Errors that abort a single cycle. The polling worker logs them and keeps going.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("malformed payload {}: {source}", path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: PayloadError,
    },

    #[error("cannot read payload {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot not persisted: {0}")]
    StorageWrite(#[source] StoreError),

    #[error("snapshot history unreadable: {0}")]
    StorageRead(#[source] StoreError),
}
