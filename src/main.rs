mod cli;
mod config;
mod data;
mod engagement;
mod monitoring;
mod narrative;
mod ranking;
mod refresh;
mod render;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command};
use config::{Config, EnvConfig};
use data::annotations::AnnotationStore;
use data::gamma_api::GammaApiClient;
use ranking::RankMode;
use refresh::{RefreshOrchestrator, SnapshotReceiver};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (mut config, found) = Config::load_or_default(&cli.config)?;
    let env_config = EnvConfig::load()?;
    config.apply_env(&env_config);

    monitoring::logger::init(&config.logging);

    tracing::info!("🚀 Market Pulse starting...");
    if !found {
        tracing::warn!("Config file {} not found, using defaults", cli.config);
    }

    let annotations = match &config.annotations.path {
        Some(path) => AnnotationStore::from_json_file(path)?,
        None => AnnotationStore::demo(),
    };
    tracing::info!("Discussion threads loaded for {} markets", annotations.len());

    let demo = config.refresh.demo_only || cli.command.demo();
    let interval = config.refresh_interval();
    let (orchestrator, receiver) = if demo {
        tracing::info!("Demo mode: live feed disabled");
        RefreshOrchestrator::<GammaApiClient>::demo_only(interval)
    } else {
        tracing::info!("Feed: {} (every {}s)", config.feed.gamma_url, interval.as_secs());
        let client = GammaApiClient::new(config.feed.gamma_url.clone(), config.request_timeout())?;
        RefreshOrchestrator::new(client, interval)
    };

    match cli.command {
        Command::Watch { mode, all, .. } => {
            let mode = mode.unwrap_or(config.ranking.default_mode);
            watch(&orchestrator, receiver, mode, all, &annotations).await?;
        }
        Command::Rank { mode, all, .. } => {
            let mode = mode.unwrap_or(config.ranking.default_mode);
            let snapshot = orchestrator.refresh().await;
            print!("{}", render::render_view(Some(&snapshot), mode, all, &annotations));
        }
        Command::Explain { market_id, .. } => {
            let snapshot = orchestrator.refresh().await;
            let record = snapshot
                .find(&market_id)
                .with_context(|| format!("Market {} is not in the current snapshot", market_id))?;
            let thread = annotations.thread(&market_id);
            print!("{}", render::render_explain(record, &thread, Utc::now()));
        }
    }

    Ok(())
}

/// Re-render on every published snapshot until Ctrl-C.
async fn watch(
    orchestrator: &RefreshOrchestrator<GammaApiClient>,
    mut receiver: SnapshotReceiver,
    mode: RankMode,
    all: bool,
    annotations: &AnnotationStore,
) -> Result<()> {
    print!("{}", render::render_view(None, mode, all, annotations));

    let render_loop = async {
        while receiver.changed().await.is_ok() {
            let snapshot = receiver.borrow_and_update().clone();
            println!("{}", "─".repeat(60));
            print!("{}", render::render_view(snapshot.as_deref(), mode, all, annotations));
        }
    };

    tokio::select! {
        _ = orchestrator.run() => {}
        _ = render_loop => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            tracing::info!("Shutting down...");
        }
    }

    Ok(())
}
