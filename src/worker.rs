// Polling worker: runs one cycle per tick (fixed interval or cron) until shutdown.
// A failed cycle is logged and the loop waits for the next tick.

use crate::cycle::{CheckOutcome, Cycle};
use crate::snapshot_repo::SnapshotRepo;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Interval, interval};
use tracing::{Instrument, debug, info, warn};

/// Worker timing config.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub interval_secs: u64,
    /// Cron expression (local time); replaces the fixed interval when set.
    pub cron: Option<String>,
}

pub struct WorkerDeps {
    pub cycle: Arc<Cycle>,
    pub repo: Arc<SnapshotRepo>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

enum Ticker {
    Interval(Interval),
    Cron(mpsc::Receiver<()>),
}

impl Ticker {
    fn new(config: &WorkerConfig) -> Self {
        if let Some(expr) = &config.cron {
            match cron::Schedule::from_str(expr) {
                Ok(schedule) => {
                    let (tx, rx) = mpsc::channel(1);
                    tokio::spawn(cron_scheduler(schedule, tx));
                    return Ticker::Cron(rx);
                }
                Err(e) => {
                    warn!(cron = %expr, error = %e, "invalid schedule.cron; using interval_secs");
                }
            }
        }
        let mut tick = interval(Duration::from_secs(config.interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        Ticker::Interval(tick)
    }

    /// Waits for the next tick. `false` once the cron scheduler has stopped.
    async fn tick(&mut self) -> bool {
        match self {
            Ticker::Interval(tick) => {
                tick.tick().await;
                true
            }
            Ticker::Cron(rx) => rx.recv().await.is_some(),
        }
    }
}

/// Sends on `tx` at each scheduled time.
async fn cron_scheduler(schedule: cron::Schedule, tx: mpsc::Sender<()>) {
    loop {
        let now = chrono::Local::now();
        let Some(next) = schedule.after(&now).next() else {
            debug!("cron schedule has no upcoming times");
            break;
        };
        let delay = (next - now).to_std().unwrap_or(Duration::from_secs(1));
        tokio::time::sleep(delay).await;
        if tx.send(()).await.is_err() {
            break;
        }
    }
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        cycle,
        repo,
        mut shutdown_rx,
    } = deps;

    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        interval_secs = config.interval_secs
    );

    tokio::spawn(async move {
        let mut ticker = Ticker::new(&config);
        let mut cycles_ok: u64 = 0;
        let mut cycles_failed: u64 = 0;

        loop {
            tokio::select! {
                alive = ticker.tick() => {
                    if !alive {
                        warn!("scheduler stopped; worker exiting");
                        break;
                    }
                    match cycle.run_cycle().await {
                        Ok(report) => {
                            cycles_ok += 1;
                            let record = matches!(report.outcome, CheckOutcome::NewRecord { .. });
                            info!(
                                record_id = report.record_id,
                                new_record = record,
                                cycles_ok,
                                cycles_failed,
                                "cycle complete"
                            );
                            match repo.prune_old_data().await {
                                Ok(0) => {}
                                Ok(n) => {
                                    debug!(operation = "prune_old_data", pruned = n, "old snapshots pruned");
                                }
                                Err(e) => {
                                    warn!(
                                        error = %e,
                                        operation = "prune_old_data",
                                        "Failed to prune old snapshots"
                                    );
                                }
                            }
                        }
                        Err(e) => {
                            cycles_failed += 1;
                            warn!(error = %e, cycles_failed, "cycle failed; waiting for next tick");
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    debug!("Worker shutting down");
                    break;
                }
            }
        }
    }
    .instrument(worker_span))
}
