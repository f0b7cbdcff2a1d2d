// Framework bootstrap for the arena server runtime.

use crate::domain::ArenaTuning;
use crate::frameworks::config;
use crate::interface_adapters::net::{spawn_world_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{ArenaSettings, spawn_arena};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves the arena on an already bound listener.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_arena(listener, configured_settings()).await
}

/// Serves an arena built from explicit settings instead of the environment.
pub async fn run_arena(
    listener: tokio::net::TcpListener,
    settings: ArenaSettings,
) -> Result<()> {
    let address = listener.local_addr()?;
    // build state
    let state = build_state(settings);
    // Start the Web Server
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn configured_settings() -> ArenaSettings {
    let mut tuning = ArenaTuning::default();
    tuning.world.obstacle_count = config::obstacle_count();

    ArenaSettings {
        input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
        world_broadcast_capacity: config::WORLD_BROADCAST_CAPACITY,
        tick_interval: config::tick_interval(),
        broadcast_interval: config::broadcast_interval(),
        tuning,
        seed: arena_seed(config::seed()),
    }
}

// Fresh OS-backed entropy unless a seed is pinned for reproducible layouts.
fn arena_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(rand::random)
}

fn build_state(settings: ArenaSettings) -> Arc<AppState> {
    tracing::debug!(
        seed = settings.seed,
        tick_ms = settings.tick_interval.as_millis() as u64,
        broadcast_ms = settings.broadcast_interval.as_millis() as u64,
        obstacles = settings.tuning.world.obstacle_count,
        "arena configured"
    );

    // Spawn the world task and the serializer that fans snapshots out as shared bytes.
    let arena = spawn_arena(settings);
    spawn_world_serializer(&arena);

    Arc::new(AppState::new(&arena, config::NOTICE_CHANNEL_CAPACITY))
}
