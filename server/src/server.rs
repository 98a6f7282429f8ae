use crate::store::SnapshotStore;
use crate::web::{self, ApiError};
use anyhow::Context;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use shared::{BoardSnapshot, RunInfo, ServerError};
use sim::{SimConfig, Simulation};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GENERATIONS: u64 = 10_000;
const DEFAULT_PUBLISH_INTERVAL: u64 = 100;
const DEFAULT_HISTORY_LIMIT: usize = 64;

#[derive(Clone)]
pub struct AppState {
    pub store: SnapshotStore,
    pub config: Arc<SimConfig>,
}

/// Everything the service needs to start, read from the environment
#[derive(Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub generations: u64,
    pub publish_interval: u64,
    pub history_limit: usize,
    pub config: SimConfig,
}

impl Settings {
    /// `SIM_CONFIG` names an optional JSON config file; `BIND_ADDR`,
    /// `GENERATIONS`, `PUBLISH_INTERVAL` and `HISTORY_LIMIT` override defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = match env::var("SIM_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {path}"))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse config file {path}"))?
            }
            Err(_) => SimConfig::default(),
        };

        Ok(Self {
            bind_addr: env_or("BIND_ADDR", DEFAULT_BIND_ADDR.parse::<SocketAddr>()?)?,
            generations: env_or("GENERATIONS", DEFAULT_GENERATIONS)?,
            publish_interval: env_or("PUBLISH_INTERVAL", DEFAULT_PUBLISH_INTERVAL)?,
            history_limit: env_or("HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?,
            config,
        })
    }
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("Invalid value for {name}: {raw}")),
        Err(_) => Ok(default),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(web::health))
        .route("/api/run", get(handle_run))
        .route("/api/config", get(handle_config))
        .route("/api/snapshot/latest", get(handle_latest))
        .route("/api/snapshot/:generation", get(handle_generation))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let simulation =
        Simulation::with_founders(settings.config.clone()).context("Invalid simulation config")?;
    let store = SnapshotStore::new(
        settings.config.rows,
        settings.config.cols,
        settings.history_limit,
    );

    let publisher = store.clone();
    let (generations, interval) = (settings.generations, settings.publish_interval);
    let driver = tokio::task::spawn_blocking(move || drive(simulation, &publisher, generations, interval));
    tokio::spawn(watch_driver(driver));

    let state = AppState {
        store,
        config: Arc::new(settings.config),
    };
    let app = router(state);

    tracing::info!("Server listening on {}", settings.bind_addr);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run the simulation to completion, publishing the starting board, every
/// `interval`-th generation and the last one. Must run off the async runtime.
pub fn drive(mut simulation: Simulation, store: &SnapshotStore, generations: u64, interval: u64) {
    store.publish_blocking(simulation.snapshot());
    let start = simulation.generation();

    simulation.run_with(generations, |simulation| {
        let done = simulation.generation() - start;
        if (interval > 0 && done % interval == 0) || done == generations {
            tracing::info!(
                generation = simulation.generation(),
                population = simulation.board().population(),
                "Publishing snapshot"
            );
            store.publish_blocking(simulation.snapshot());
        }
    });

    tracing::info!(generation = simulation.generation(), "Simulation complete");
}

/// Wait for the simulation thread; a panic there stops publishing, so report it.
/// Returns whether the run finished cleanly.
async fn watch_driver(driver: tokio::task::JoinHandle<()>) -> bool {
    match driver.await {
        Ok(()) => true,
        Err(err) => {
            tracing::error!("Simulation task failed, snapshots are no longer updated: {}", err);
            false
        }
    }
}

async fn handle_run(State(state): State<AppState>) -> Json<RunInfo> {
    Json(state.store.run_info().await)
}

async fn handle_config(State(state): State<AppState>) -> Json<Arc<SimConfig>> {
    Json(state.config)
}

async fn handle_latest(State(state): State<AppState>) -> Result<Json<Arc<BoardSnapshot>>, ApiError> {
    let snapshot = state.store.latest().await.ok_or(ServerError::NoSnapshot)?;
    Ok(Json(snapshot))
}

async fn handle_generation(
    State(state): State<AppState>,
    Path(generation): Path<u64>,
) -> Result<Json<Arc<BoardSnapshot>>, ApiError> {
    let snapshot = state
        .store
        .by_generation(generation)
        .await
        .ok_or(ServerError::UnknownGeneration { generation })?;
    Ok(Json(snapshot))
}
