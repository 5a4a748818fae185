//! AIS vessel arrival notifier

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ais_watch::{
    barentswatch::BarentsWatchClient,
    config::AppConfig,
    database::Database,
    dedup::DeduplicationEngine,
    errors::AisWatchError,
    formatter::{CountryResolver, LookupTables, NoFlagEmoji, NotificationFormatter, RegionalIndicators},
    geometry::load_geometry_file,
    models::IgnoreList,
    notifier::{LogNotifier, Notifier, SlackWebhook},
    poll::{PollCycle, PollSettings},
    server::{self, AppState},
    store::{MemoryBackend, SeenVesselBackend, SightingStore},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AisWatchError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let backend: Arc<dyn SeenVesselBackend> = match &config.database.url {
        Some(url) => {
            Arc::new(Database::from_url(url, config.database.max_connections).await?)
        }
        None => {
            warn!("No database configured, sighting state will be lost on restart");
            Arc::new(MemoryBackend::new())
        }
    };
    let store = Arc::new(SightingStore::open(backend).await);

    let webhook: Option<Arc<dyn Notifier>> = match &config.slack.webhook_url {
        Some(url) => Some(Arc::new(SlackWebhook::new(url.as_str())?) as Arc<dyn Notifier>),
        None => None,
    };
    let notifier: Arc<dyn Notifier> = match &webhook {
        Some(webhook) => webhook.clone(),
        None => {
            warn!("No Slack webhook configured, notifications are only logged");
            Arc::new(LogNotifier)
        }
    };

    let resolver: Box<dyn CountryResolver> = if config.monitor.flag_emoji {
        Box::new(RegionalIndicators)
    } else {
        Box::new(NoFlagEmoji)
    };

    let cycle = Arc::new(PollCycle::new(
        Arc::new(BarentsWatchClient::new(config.barentswatch.clone())?),
        notifier,
        DeduplicationEngine::new(store),
        NotificationFormatter::new(LookupTables::load(), resolver),
        IgnoreList::new(config.monitor.ignore.clone()),
        PollSettings::from(&config.monitor),
    ));

    let mut state = AppState::new(cycle.clone(), config.monitor.geojson_path.clone());
    if let Some(webhook) = webhook {
        state = state.with_webhook(webhook);
    }
    let listener = TcpListener::bind(config.server.bind.as_str()).await?;
    info!("Listening on {}", config.server.bind);

    tokio::select! {
        result = async { axum::serve(listener, server::router(state)).await } => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
        }
        _ = run_poller(cycle, &config.monitor.geojson_path, config.monitor.poll_interval) => {}
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}

/// Run a poll cycle every `interval`; never returns.
///
/// The area file is re-read on every tick so it can be edited while running.
async fn run_poller(cycle: Arc<PollCycle>, geojson_path: &Path, interval: Duration) {
    if interval.is_zero() {
        info!("Background polling disabled");
        return std::future::pending().await;
    }

    info!("Polling every {} s", interval.as_secs());
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let geometry = match load_geometry_file(geojson_path) {
            Ok(geometry) => geometry,
            Err(e) => {
                error!("Failed to load monitored area: {}", e);
                continue;
            }
        };

        if let Err(e) = cycle.run(&geometry).await {
            error!("Poll cycle rejected: {}", e);
        }
    }
}
