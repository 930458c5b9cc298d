// SQLite snapshot store: append-only, one row per extraction run.
// Ordering key is the embedded created_at (ms); the AUTOINCREMENT id breaks ties.

mod blob;

use crate::error::StoreError;
use crate::models::{PeakLocation, RecordId, SnapshotSummary, StoredSnapshot};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

/// The two newest snapshots, or how many exist when there are fewer than two.
#[derive(Debug, Clone, PartialEq)]
pub enum LatestTwo {
    Pair {
        most_recent: StoredSnapshot,
        previous: StoredSnapshot,
    },
    Insufficient {
        count: usize,
    },
}

pub struct SnapshotRepo {
    pool: SqlitePool,
    retention_ms: i64,
}

impl SnapshotRepo {
    /// `retain_days = 0` keeps every snapshot.
    pub async fn connect(path: &str, retain_days: u32) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Full);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        let retention_ms = (retain_days as i64) * 24 * 60 * 60 * 1000;
        Ok(Self { pool, retention_ms })
    }

    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at INTEGER NOT NULL,
                all_time_max REAL,
                peak_year TEXT,
                peak_depth TEXT,
                year_data BLOB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_snapshots_created_at ON snapshots(created_at, id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts one snapshot under an exclusive write lock. Nothing is visible until commit.
    #[instrument(skip(self, summary), fields(repo = "snapshots", operation = "append", created_at = summary.created_at))]
    pub async fn append(&self, summary: &SnapshotSummary) -> Result<RecordId, StoreError> {
        let year_data =
            blob::encode_year_maxima(&summary.max_temp_by_year).map_err(StoreError::Encode)?;

        // IMMEDIATE takes the database write lock up front; a concurrent run waits on busy_timeout.
        // Dropping `tx` before commit (error or cancelled future) rolls back.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let id = insert_snapshot(&mut *tx, summary, &year_data).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Every stored snapshot, oldest first.
    #[instrument(skip(self), fields(repo = "snapshots", operation = "list_all"))]
    pub async fn list_all(&self) -> Result<Vec<StoredSnapshot>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, created_at, all_time_max, peak_year, peak_depth, year_data
             FROM snapshots ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_snapshot_row).collect()
    }

    /// The `limit` newest snapshots, oldest first.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<StoredSnapshot>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, created_at, all_time_max, peak_year, peak_depth, year_data
             FROM snapshots ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        let mut out = rows
            .iter()
            .map(parse_snapshot_row)
            .collect::<Result<Vec<_>, _>>()?;
        out.reverse();
        Ok(out)
    }

    #[instrument(skip(self), fields(repo = "snapshots", operation = "latest_two"))]
    pub async fn latest_two(&self) -> Result<LatestTwo, StoreError> {
        let rows = sqlx::query(
            "SELECT id, created_at, all_time_max, peak_year, peak_depth, year_data
             FROM snapshots ORDER BY created_at DESC, id DESC LIMIT 2",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut snapshots = rows
            .iter()
            .map(parse_snapshot_row)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();
        match (snapshots.next(), snapshots.next()) {
            (Some(most_recent), Some(previous)) => Ok(LatestTwo::Pair {
                most_recent,
                previous,
            }),
            (first, _) => Ok(LatestTwo::Insufficient {
                count: usize::from(first.is_some()),
            }),
        }
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM snapshots")
            .fetch_one(&self.pool)
            .await?;
        Ok(n as u64)
    }

    /// Drops snapshots older than the retention window, always keeping the newest two.
    #[instrument(skip(self), fields(repo = "snapshots", operation = "prune_old_data"))]
    pub async fn prune_old_data(&self) -> Result<u64, StoreError> {
        if self.retention_ms == 0 {
            return Ok(0);
        }
        let cutoff = chrono::Utc::now().timestamp_millis() - self.retention_ms;
        let r = sqlx::query(
            "DELETE FROM snapshots WHERE created_at < $1 AND id NOT IN
             (SELECT id FROM snapshots ORDER BY created_at DESC, id DESC LIMIT 2)",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected())
    }
}

async fn insert_snapshot(
    conn: &mut SqliteConnection,
    summary: &SnapshotSummary,
    year_data: &[u8],
) -> Result<RecordId, StoreError> {
    let (peak_year, peak_depth) = match &summary.peak {
        Some(p) => (Some(p.year.as_str()), Some(p.depth.as_str())),
        None => (None, None),
    };
    let r = sqlx::query(
        "INSERT INTO snapshots (created_at, all_time_max, peak_year, peak_depth, year_data) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(summary.created_at)
    .bind(summary.all_time_max)
    .bind(peak_year)
    .bind(peak_depth)
    .bind(year_data)
    .execute(&mut *conn)
    .await?;
    Ok(r.last_insert_rowid())
}

fn parse_snapshot_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredSnapshot, StoreError> {
    let id: i64 = row.try_get("id")?;
    let created_at: i64 = row.try_get("created_at")?;
    let all_time_max: Option<f64> = row.try_get("all_time_max")?;
    let peak_year: Option<String> = row.try_get("peak_year")?;
    let peak_depth: Option<String> = row.try_get("peak_depth")?;
    let year_data: Vec<u8> = row.try_get("year_data")?;

    let max_temp_by_year = blob::decode_year_maxima(&year_data).unwrap_or_else(|e| {
        tracing::warn!(id, error = %e, "year_data unreadable, using empty per-year maxima");
        Default::default()
    });
    let peak = match (peak_year, peak_depth) {
        (Some(year), Some(depth)) => Some(PeakLocation { year, depth }),
        _ => None,
    };

    Ok(StoredSnapshot {
        id,
        summary: SnapshotSummary {
            created_at,
            max_temp_by_year,
            all_time_max,
            peak,
        },
    })
}
