use anyhow::Result;
use clap::{Parser, Subcommand};
use heatwatch::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[derive(Parser)]
#[command(name = "heatwatch", version = version::VERSION, about = "Ocean temperature record watcher")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize the current heatmap payload and store the snapshot
    Extract,
    /// Compare the two newest snapshots and alert on a new record
    Check,
    /// Extract then check, once
    Cycle,
    /// Run cycles on the configured schedule until interrupted
    Run,
    /// Print stored snapshots as JSON, oldest first
    History {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Send the "you are on the hotlist" confirmation to a new subscriber
    Acknowledge { email: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let app_config = config::AppConfig::load()?;

    let repo = Arc::new(
        snapshot_repo::SnapshotRepo::connect(&app_config.store.path, app_config.store.retain_days)
            .await?,
    );
    repo.init().await?;
    let notifier = Arc::new(notify::Notifier::from_config(&app_config.notify)?);
    let cycle = Arc::new(cycle::Cycle::from_config(
        &app_config,
        repo.clone(),
        notifier.clone(),
    ));

    match cli.command {
        Command::Extract => {
            cycle.extract_and_persist().await?;
        }
        Command::Check => {
            cycle.check_and_notify().await?;
        }
        Command::Cycle => {
            cycle.run_cycle().await?;
        }
        Command::History { limit } => {
            let snapshots = repo.list_recent(limit).await?;
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
        }
        Command::Acknowledge { email } => {
            let delivered = notifier
                .acknowledge(&app_config.source.location, &email)
                .await
                .map_err(|e| anyhow::anyhow!("acknowledgement to {} failed: {}", email, e))?;
            tracing::info!(subscriber = %email, delivered, "acknowledgement sent");
        }
        Command::Run => run_forever(app_config, cycle, repo).await?,
    }

    Ok(())
}

async fn run_forever(
    app_config: config::AppConfig,
    cycle: Arc<cycle::Cycle>,
    repo: Arc<snapshot_repo::SnapshotRepo>,
) -> Result<()> {
    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        interval_secs = app_config.schedule.interval_secs,
        cron = ?app_config.schedule.cron,
        "starting polling loop"
    );
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            cycle,
            repo,
            shutdown_rx,
        },
        worker::WorkerConfig {
            interval_secs: app_config.schedule.interval_secs,
            cron: app_config.schedule.cron.clone(),
        },
    );

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    worker_handle.await?;
    Ok(())
}
