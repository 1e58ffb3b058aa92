//!
//! Roaming Hub — EV charging inventory API.
//! Reads configuration from TOML file (~/.config/roaming-hub/config.toml).

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use roaming_hub::notifications::sinks::{ConsoleSink, DiskSink, NetworkSink, PushStreamSink};
use roaming_hub::notifications::{event_names, EventRegistry, EventSink};
use roaming_hub::shared::shutdown::ShutdownCoordinator;
use roaming_hub::{
    create_api_router, create_event_bus, default_config_path, AppConfig, EntityDirectory,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("ROAMING_HUB_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Roaming Hub...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Entity directory ───────────────────────────────────────
    let directory = EntityDirectory::shared();
    if let Some(seed_file) = &app_cfg.inventory.seed_file {
        if let Err(e) = directory.load_seed(seed_file).await {
            error!("Failed to load inventory seed: {}", e);
            return Err(e.into());
        }
    } else {
        warn!("No inventory seed configured; directory starts empty");
    }

    // ── Event bus, sinks and registry ──────────────────────────
    let event_bus = create_event_bus();
    info!("Event bus initialized");

    let push_sink = Arc::new(PushStreamSink::new());

    let default_sinks: Vec<Arc<dyn EventSink>> = if app_cfg.events.default_sinks {
        let disk_sink = DiskSink::create(&app_cfg.events.log_directory)
            .await
            .map_err(|e| {
                error!("Failed to create event log directory: {}", e);
                e
            })?;
        vec![Arc::new(ConsoleSink::new()), Arc::new(disk_sink)]
    } else {
        Vec::new()
    };

    let network_sink: Option<Arc<dyn EventSink>> = app_cfg.events.network_sink.as_ref().map(|addr| {
        Arc::new(NetworkSink::new(
            addr.clone(),
            Duration::from_millis(app_cfg.events.network_timeout_ms),
        )) as Arc<dyn EventSink>
    });

    let registry = Arc::new(EventRegistry::with_defaults(
        Arc::clone(&event_bus),
        default_sinks,
    ));

    for &name in event_names::ALL {
        let mut handle = registry
            .register(name, &tags_for(name))
            .attach_sink(Arc::clone(&push_sink) as Arc<dyn EventSink>);
        if let Some(sink) = &network_sink {
            handle = handle.attach_sink(Arc::clone(sink));
        }
        let _ = handle;
    }
    info!(
        events = event_names::ALL.len(),
        "Event registrations complete"
    );

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(
        directory,
        Arc::clone(&event_bus),
        push_sink,
        prometheus_handle,
    );

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs", api_addr);

    let api_shutdown = shutdown_signal.clone();
    axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    // ── Final cleanup ──────────────────────────────────────────
    info!("Tearing down event registrations...");
    for &name in event_names::ALL {
        registry.unregister(name);
    }

    info!("Roaming Hub shutdown complete");
    Ok(())
}

/// Descriptive tags per event name (registration bookkeeping, not
/// routing).
fn tags_for(name: &str) -> Vec<&'static str> {
    match name {
        event_names::AUTH_EVSE_START
        | event_names::AUTH_EVSE_STARTED
        | event_names::AUTH_EVSE_STOP
        | event_names::AUTH_EVSE_STOPPED => vec!["auth", "evse"],
        event_names::REMOTE_EVSE_START
        | event_names::REMOTE_EVSE_STARTED
        | event_names::REMOTE_EVSE_STOP
        | event_names::REMOTE_EVSE_STOPPED => vec!["remote", "evse"],
        event_names::SEND_CDR | event_names::CDR_SENT => vec!["cdr"],
        event_names::GET_EVSES_STATUS_REQUEST => vec!["status", "evse"],
        _ => vec![],
    }
}
