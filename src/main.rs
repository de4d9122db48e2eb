//! ecweather - Environment Canada citypage forecasts on the command line
//!
//! Fetches (or reads) a citypage document, normalizes it into current,
//! daily and hourly records and prints them as text or JSON.

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ecweather::cache::CacheManager;
use ecweather::cli::{Cli, StartupConfig};
use ecweather::engine::{NormalizeError, NormalizedFeed};
use ecweather::provider::Provider;
use ecweather::refresh::{RefreshConfig, RefreshHandle, RefreshMessage};
use ecweather::report::{render_json, render_text};

fn print_feed(feed: &NormalizedFeed, config: &StartupConfig) -> Result<(), serde_json::Error> {
    if config.json {
        println!("{}", render_json(feed, &config.engine)?);
    } else {
        print!("{}", render_text(feed, &config.engine));
    }
    Ok(())
}

/// Polls until interrupted, printing after every completed cycle
///
/// Passes that fail keep showing their last good result.
async fn watch(
    provider: Arc<Provider>,
    config: &StartupConfig,
    refresh: RefreshConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut handle = RefreshHandle::spawn(provider, refresh);
    let mut latest = NormalizedFeed {
        current: Err(NormalizeError::NoDataAvailable),
        daily: Err(NormalizeError::NoDataAvailable),
        hourly: Vec::new(),
    };

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            message = handle.recv() => {
                let Some(message) = message else {
                    warn!("background poller stopped");
                    break;
                };
                match message {
                    RefreshMessage::RefreshStarted => info!("refreshing"),
                    RefreshMessage::CurrentUpdated(record) => latest.current = Ok(record),
                    RefreshMessage::ForecastUpdated(days) => latest.daily = Ok(days),
                    RefreshMessage::HourlyUpdated(hours) => latest.hourly = hours,
                    RefreshMessage::RefreshError(e) => warn!(error = %e, "refresh failed"),
                    RefreshMessage::RefreshCompleted => print_feed(&latest, config)?,
                }
            }
            _ = &mut ctrl_c => {
                info!("interrupted; stopping");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let mut provider = Provider::new(config.source.clone(), config.engine);
    if config.persist_cache {
        match CacheManager::new() {
            Some(store) => provider = provider.with_store(store),
            None => warn!("no cache directory available; temperature cache stays in memory"),
        }
    }

    match config.watch {
        Some(interval) => {
            let refresh = RefreshConfig {
                interval,
                enabled: true,
            };
            watch(Arc::new(provider), &config, refresh).await
        }
        None => {
            let feed = provider.poll().await.map_err(|e| {
                error!(error = %e, "citypage poll failed");
                e
            })?;
            print_feed(&feed, &config)?;
            Ok(())
        }
    }
}
