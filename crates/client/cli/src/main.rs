//! Headless client: loads content, plays a scripted encounter and prints
//! the resulting ability save records as JSON.
mod config;
mod script;

use anyhow::{Context, Result};
use maze_runtime::{Event, Runtime, Topic};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = setup_logging(&config)?;

    let mut builder = Runtime::builder().load_content(&config.data_dir, &config.maze)?;
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }

    let mut runtime = builder.build().await?;
    let handle = runtime.handle();
    let opening = handle.snapshot().await?;
    info!(
        maze = %config.maze,
        enemies = opening.enemies.len(),
        player = %opening.player.position,
        "encounter loaded"
    );

    runtime.set_input_provider(script::encounter(&opening));
    let receivers = handle.subscribe_multiple(&Topic::ALL);
    let logger = tokio::spawn(log_events(receivers));

    let reports = runtime.run_ticks(config.ticks).await?;
    let rejected: usize = reports.iter().map(|report| report.rejected.len()).sum();
    let closing = handle.snapshot().await?;
    info!(
        ticks = reports.len(),
        rejected,
        enemies_left = closing.enemies.len(),
        health = closing.player.health,
        mana = closing.player.mana,
        "encounter finished"
    );

    let records = handle.save_abilities().await?;
    let json = serde_json::to_string_pretty(&records).context("serializing ability records")?;
    println!("{json}");

    drop(handle);
    runtime.shutdown().await?;
    logger.await.context("event logger task")?;
    Ok(())
}

/// Logs every bus event until all topics close.
async fn log_events(receivers: Vec<(Topic, broadcast::Receiver<Event>)>) {
    let tasks: Vec<_> = receivers
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(Event::Simulation(event)) => {
                            info!(?topic, name = event.name(), ?event, "sim event")
                        }
                        Ok(Event::Worker(event)) => debug!(?event, "worker event"),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(?topic, skipped, "event logger lagged")
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect();
    for task in tasks {
        let _ = task.await;
    }
}

/// Logs to stderr and, when the log directory can be created, to a file.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(config: &CliConfig) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let log_dir = config.resolved_log_dir();
    let file_writer = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::never(&log_dir, "maze-cli.log");
            Some(tracing_appender::non_blocking(file_appender))
        }
        Err(err) if config.log_dir.is_some() => {
            return Err(err)
                .with_context(|| format!("creating log directory {}", log_dir.display()));
        }
        // The platform default is optional; stderr alone is enough.
        Err(_) => None,
    };
    let (file_layer, guard) = match file_writer {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    match guard {
        Some(_) => info!(log_dir = %log_dir.display(), "logging initialized"),
        None => info!("logging initialized (stderr only)"),
    }
    Ok(guard)
}
