use std::{path::PathBuf, sync::Arc};

use agendalive::{
    config::AppConfig,
    logging::init_tracing,
    remote::churchtools::ChurchToolsClient,
    runtime::{
        events::AgendaEvent,
        handle::{AgendaLiveHandle, spawn_agendalive},
    },
    variables::VariableSnapshot,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

const WATCH_REFRESH_MS: u64 = 2_000;

#[derive(Debug, Parser)]
#[command(name = "agendalive", version, about = "Drive a ChurchTools live agenda")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long, default_value = "agendalive.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current live state.
    Show,
    /// Go to the next agenda item.
    Next,
    /// Go to the previous agenda item.
    Previous,
    /// Add time to the current item.
    AddTime {
        /// Seconds to add.
        #[arg(default_value_t = 60)]
        seconds: i64,
    },
    /// Take time from the current item.
    ReduceTime {
        /// Seconds to take.
        #[arg(default_value_t = 60)]
        seconds: i64,
    },
    /// Print every change until interrupted.
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_tracing(&config.logging);

    // Commands reload explicitly so a failed reload is reported, not just logged.
    config.runtime.reload_on_start = false;
    if matches!(cli.command, Command::Watch) && config.runtime.refresh_interval_ms == 0 {
        config.runtime.refresh_interval_ms = WATCH_REFRESH_MS;
    }
    let client = ChurchToolsClient::new(&config.connection).context("building ChurchTools client")?;
    let handle = spawn_agendalive(Arc::new(client), config.runtime);

    let result = run(&handle, cli.command).await;
    if let Err(err) = handle.shutdown().await {
        warn!("shutdown failed: {err}");
    }
    result
}

async fn run(handle: &AgendaLiveHandle, command: Command) -> Result<()> {
    // Subscribed first so `watch` also sees the events of the initial reload.
    let mut events = handle.subscribe();
    let loaded = handle.reload().await.context("reloading next event")?;

    let vars = match command {
        Command::Show => loaded,
        Command::Next => handle.advance().await?,
        Command::Previous => handle.reverse().await?,
        Command::AddTime { seconds } => handle.add_time(seconds).await?,
        Command::ReduceTime { seconds } => handle.reduce_time(seconds).await?,
        Command::Watch => return watch(&mut events).await,
    };
    print_snapshot(&vars);
    Ok(())
}

async fn watch(events: &mut tokio::sync::broadcast::Receiver<AgendaEvent>) -> Result<()> {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            evt = events.recv() => match evt {
                Ok(AgendaEvent::PositionChanged(vars)) => print_snapshot(&vars),
                Ok(AgendaEvent::Reloaded { event_id, item_count, .. }) => {
                    println!("reloaded event {event_id} ({item_count} items)");
                }
                Ok(AgendaEvent::ActionFailed { action, message }) => {
                    eprintln!("{action} failed: {message}");
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event stream lagged"),
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}

fn print_snapshot(vars: &VariableSnapshot) {
    println!("{} (event {})", vars.event_name, vars.event_id);
    println!("  previous: {}", vars.previous_item_name);
    println!("  current:  {} [{:+}s]", vars.current_item_name, vars.extra_seconds);
    println!("  next:     {}", vars.next_item_name);
}
