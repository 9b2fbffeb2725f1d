/**
 * MEDISIM MONITOR - service entry point
 *
 * Loads configuration, starts one supervisor per device, then runs the
 * tick driver alongside the HTTP view until Ctrl-C.
 */

use anyhow::{Context, Result};
use chrono::Utc;
use medisim_monitor::config::{load_config, NotifierKind};
use medisim_monitor::driver::{build_supervisors, Simulation};
use medisim_monitor::feed::LogFeed;
use medisim_monitor::health::HealthTracker;
use medisim_monitor::http::{build_router, AppState};
use medisim_monitor::mqtt::{self, TelemetryPublisher};
use medisim_monitor::notifier::{LogNotifier, MqttNotifier, Notifier};
use medisim_monitor::state::new_state;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medisim_monitor=info,medisim_engine=info")),
        )
        .with_target(false)
        .init();

    let config = load_config().await;
    info!(?config, "starting MediSim monitor");

    let now = Utc::now();
    let health_tracker = HealthTracker::new();
    let feed = new_state(LogFeed::new(config.log_capacity, now));

    let client = config
        .mqtt
        .as_ref()
        .map(|conf| (mqtt::connect(conf, health_tracker.clone()), conf));

    let notifier: Arc<dyn Notifier> = match (config.notifier, &client) {
        (NotifierKind::Mqtt, Some((client, conf))) => {
            Arc::new(MqttNotifier::new(client.clone(), conf.alert_topic.as_str()))
        }
        (NotifierKind::Mqtt, None) => {
            warn!("mqtt notifier requested without an mqtt section, alerts go to the log");
            Arc::new(LogNotifier)
        }
        (NotifierKind::Log, _) => Arc::new(LogNotifier),
    };
    info!(notifier = notifier.name(), "alert notifier ready");

    let mut simulation = Simulation::new(
        build_supervisors(config.seed, now),
        Arc::new(feed.clone()),
        notifier,
        health_tracker.clone(),
    );
    if let Some((client, conf)) = &client {
        let telemetry = TelemetryPublisher::new(client.clone(), conf.telemetry_topic.as_str());
        info!(topic = telemetry.topic(), "publishing device telemetry");
        simulation = simulation.with_telemetry(telemetry);
    }

    let app = build_router(AppState {
        board: simulation.board(),
        feed,
        health_tracker,
    });
    let listener = TcpListener::bind(config.http.bind)
        .await
        .with_context(|| format!("bind {}", config.http.bind))?;
    info!(addr = %config.http.bind, "http listening");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
            error!("http server failed: {e}");
        }
    });

    simulation.run(config.tick_interval(), shutdown_signal()).await;
    server.await.context("http server task")?;
    Ok(())
}
