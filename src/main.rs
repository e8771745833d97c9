mod config;
mod data;
mod error;
mod notifications;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use config::{Config, EnvConfig};
use data::alerts::AlertInbox;
use data::api::AqiApiClient;
use data::rollup::hourly_breakdown;
use notifications::registration::RegistrationBridge;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("🌍 AirWatch monitor starting...");

    // Load configuration
    let config = Config::load("config.toml")?;
    let env_config = EnvConfig::load()?;

    let base_url = env_config
        .api_base_url
        .unwrap_or_else(|| config.api.base_url.clone());
    tracing::info!("Backend: {}", base_url);
    tracing::info!("Poll interval: {}s", config.monitor.poll_interval_secs);

    // One client instance for the whole process, shared by reference
    let client = Arc::new(AqiApiClient::new(base_url)?);

    match client.health_check().await {
        Ok(_) => tracing::info!("Backend reachable"),
        Err(e) => tracing::warn!("Backend health check failed: {}", e),
    }

    // Registration bridge; the push subsystem feeds device tokens through
    // this channel as it acquires or refreshes them.
    let (token_tx, token_rx) = mpsc::channel(16);
    let bridge = RegistrationBridge::new(Arc::clone(&client), config.registration.clone());
    tokio::spawn(bridge.run(token_rx));

    if let Some(token) = env_config.device_token {
        token_tx.send(token).await?;
    }

    // Startup snapshot: history roll-up and current forecast
    match client.fetch_history(config.monitor.history_hours).await {
        Ok(history) => {
            let breakdown = hourly_breakdown(&history);
            tracing::info!(
                "Loaded {} history records across {} hours of day",
                history.len(),
                breakdown.len()
            );
        }
        Err(e) => tracing::warn!("History fetch failed: {}", e),
    }

    match client.fetch_prediction().await {
        Ok(prediction) => tracing::info!(
            "Forecast: AQI {} ({:?}), confidence {:.0}%",
            prediction.predicted_aqi,
            prediction.trend,
            prediction.confidence * 100.0
        ),
        Err(e) => tracing::warn!("Prediction fetch failed: {}", e),
    }

    tracing::info!("✅ Monitor initialized");

    let mut inbox = AlertInbox::new();
    let mut poll = tokio::time::interval(Duration::from_secs(config.monitor.poll_interval_secs));

    loop {
        tokio::select! {
            _ = poll.tick() => {
                match client.fetch_current().await {
                    Ok(current) => tracing::info!(
                        "AQI {} (PM2.5 {:.1}, PM10 {:.1}) at {}",
                        current.aqi,
                        current.pm25,
                        current.pm10,
                        current.timestamp
                    ),
                    Err(e) => tracing::warn!("Current fetch failed: {}", e),
                }

                match client.fetch_alerts().await {
                    Ok(alerts) => {
                        inbox.sync(alerts);
                        // Log each new alert once, then acknowledge it
                        for alert in inbox.alerts().to_vec() {
                            if !alert.is_read {
                                tracing::warn!(
                                    "[{:?}] {}: {}",
                                    alert.severity,
                                    alert.title,
                                    alert.message
                                );
                                inbox.mark_read(&alert.id);
                            }
                        }
                    }
                    Err(e) => tracing::warn!("Alert fetch failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    Ok(())
}
