use tokio::sync::broadcast;

use poolbet::api::router::create_router;
use poolbet::api::ws_types::WsMessage;
use poolbet::backend::BackendClient;
use poolbet::config::AppConfig;
use poolbet::services::{odds_poller, streak_checker};
use poolbet::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = poolbet::metrics::init_metrics();

    let backend = BackendClient::new(
        reqwest::Client::new(),
        &config.backend_url,
        &config.backend_api_key,
    );
    tracing::info!(backend_url = %config.backend_url, "Backend client ready");

    // --- WebSocket broadcast channel for live odds and streak notices ---
    let (ws_tx, _) = broadcast::channel::<WsMessage>(256);

    if config.odds_poller_enabled {
        let client = backend.clone();
        let tx = ws_tx.clone();
        let interval_secs = config.odds_poll_interval_secs;
        tokio::spawn(async move {
            odds_poller::run_odds_poller(client, interval_secs, tx).await;
        });
        tracing::info!(interval_secs, "Odds poller spawned");
    } else {
        tracing::info!("Odds poller disabled (ODDS_POLLER_ENABLED=false)");
    }

    if config.streak_checker_enabled {
        let client = backend.clone();
        let tx = ws_tx.clone();
        let interval_secs = config.streak_check_interval_secs;
        tokio::spawn(async move {
            streak_checker::run_streak_checker(client, interval_secs, tx).await;
        });
        tracing::info!(interval_secs, "Streak checker spawned");
    } else {
        tracing::info!("Streak checker disabled (STREAK_CHECKER_ENABLED=false)");
    }

    if config.api_token.is_none() {
        tracing::warn!("API_TOKEN is not set, API authentication disabled");
    }

    let state = AppState {
        backend,
        config,
        ws_tx,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
