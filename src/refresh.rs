//! Background feed refresh
//!
//! Polls a [`Provider`] on a fixed interval in a tokio task and sends each
//! normalized pass back over a channel. The first poll happens immediately.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::data::WeatherRecord;
use crate::provider::Provider;

/// Messages sent from the background poller
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// Current conditions normalized
    CurrentUpdated(WeatherRecord),
    /// Daily forecast normalized, today first
    ForecastUpdated(Vec<WeatherRecord>),
    /// Hourly forecast normalized; may be empty
    HourlyUpdated(Vec<WeatherRecord>),
    /// A fetch or a single pass failed
    RefreshError(String),
    /// Refresh started
    RefreshStarted,
    /// Refresh completed
    RefreshCompleted,
}

/// Configuration for the poll interval
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between polls
    pub interval: Duration,
    /// Whether polling is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600), // 10 minutes
            enabled: true,
        }
    }
}

/// Handle for controlling the background poller
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the poller for `provider`
    ///
    /// With polling disabled no task is started and the receiver stays empty.
    pub fn spawn(provider: Arc<Provider>, config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            if !refresh_once(&provider, &msg_tx).await {
                                debug!("refresh receiver dropped; stopping poller");
                                break;
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Waits for the next message
    ///
    /// Returns `None` once the poller has stopped.
    pub async fn recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.recv().await
    }

    /// Stops the background poller
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Runs one poll and reports every pass
///
/// Returns `false` if the receiving side has gone away.
async fn refresh_once(provider: &Provider, tx: &mpsc::Sender<RefreshMessage>) -> bool {
    let mut messages = vec![RefreshMessage::RefreshStarted];

    match provider.poll().await {
        Ok(feed) => {
            messages.push(match feed.current {
                Ok(record) => RefreshMessage::CurrentUpdated(record),
                Err(e) => RefreshMessage::RefreshError(format!("current conditions: {}", e)),
            });
            messages.push(match feed.daily {
                Ok(days) => RefreshMessage::ForecastUpdated(days),
                Err(e) => RefreshMessage::RefreshError(format!("daily forecast: {}", e)),
            });
            messages.push(RefreshMessage::HourlyUpdated(feed.hourly));
        }
        Err(e) => {
            warn!(error = %e, "citypage poll failed");
            messages.push(RefreshMessage::RefreshError(e.to_string()));
        }
    }

    messages.push(RefreshMessage::RefreshCompleted);

    for message in messages {
        if tx.send(message).await.is_err() {
            return false;
        }
    }
    true
}

/// Checks for pending refresh messages without blocking
///
/// # Returns
/// * `Some(RefreshMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}
