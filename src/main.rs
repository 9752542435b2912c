use splitscope::{MonitorConfig, Monitors};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod calls;
mod handlers;
mod load_generator;
mod middleware;
mod mock_data;
mod reporter;
mod server;
mod store;

/// Environment variable naming an optional JSON `MonitorConfig` file.
const CONFIG_ENV: &str = "SPLITSCOPE_CONFIG";

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// In-memory catalog with simulated round-trip latency.
    pub store: Arc<store::Store>,

    /// Monitor hub plus its sample windows, histograms and call-tree alert.
    pub monitors: Arc<Monitors>,

    /// Flag checked by every load-generator worker on each iteration.
    pub load_running: Arc<AtomicBool>,

    /// Handle to the spawned load-generator task so we can await clean shutdown.
    pub load_handle: tokio::sync::Mutex<Option<tokio::task::JoinHandle<()>>>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── 1. Load monitor configuration ────────────────────────────
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid monitor configuration");
            std::process::exit(1);
        }
    };
    let monitors = match Monitors::new(&config) {
        Ok(monitors) => Arc::new(monitors),
        Err(e) => {
            tracing::error!(error = %e, "cannot build monitors");
            std::process::exit(1);
        }
    };

    // ── 2. Seed mock data ────────────────────────────────────────
    let store = Arc::new(store::Store::new(50, 400));
    mock_data::seed(&store);

    // ── 3. Build shared state ────────────────────────────────────
    let state = Arc::new(AppState {
        store,
        monitors: monitors.clone(),
        load_running: Arc::new(AtomicBool::new(false)),
        load_handle: tokio::sync::Mutex::new(None),
    });

    tokio::spawn(reporter::run(monitors, reporter::REPORT_INTERVAL));

    // ── 4. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state);

    // ── 5. Bind & serve ──────────────────────────────────────────
    let addr = "0.0.0.0:3000";
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind, is the port already in use?");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "server listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server exited with error");
    }
}

/// Defaults, overridden by the JSON file named in `SPLITSCOPE_CONFIG`.
fn load_config() -> Result<MonitorConfig, splitscope::ConfigError> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(MonitorConfig::default());
    };
    let json = std::fs::read_to_string(&path)
        .map_err(|e| splitscope::ConfigError::Parse(format!("{path}: {e}")))?;
    let config = MonitorConfig::from_json(&json)?;
    tracing::info!(%path, "monitor configuration loaded");
    Ok(config)
}
