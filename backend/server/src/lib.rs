//! Back-office service for the storefront's featured categories.
//!
//! The storefront highlights a short, hand-ordered list of catalog categories. Admins add,
//! remove and reorder that list here; the storefront only ever reads it.
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | GET | `/featured-categories` | |
//! | POST | `/featured-categories/add` | `{ categoryId }` |
//! | PUT | `/featured-categories/{id}` | `{ index }` |
//! | DELETE | `/featured-categories/{id}` | |
//! | PUT | `/featured-categories/reorder` | see [`payloads`] |
//! | GET | `/categories` | |
//!
//! Mutating routes sit behind [`auth::require_admin`]. Errors are `{ "error": "..." }`.
//!
//!
//!
//! # Ordering
//!
//! Positions are 1-based and dense. Adds append, deletes close the gap, a move shifts the
//! block between the old and new slot by one. Reorder assigns the supplied order as is and
//! does not touch entries left out of the request; whether it should renumber the rest the
//! way a single move does is still an open product question.
//!
//!
//!
//! # Setup
//!
//! Environment is read once at startup, see [`config::Config`].
//!
//! Run against a local Redis.
//! ```sh
//! REDIS_URL=redis://localhost:6379 RUST_LOG=info cargo run -p featured-server
//! ```
//!
//! Run without Redis.
//! ```sh
//! FEATURED_STORE=memory RUST_LOG=info cargo run -p featured-server
//! ```
//!
//! Load categories.
//! ```sh
//! cargo run -p seed -- categories.json --redis-url redis://localhost:6379
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod featured;
pub mod models;
pub mod ordering;
pub mod payloads;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use auth::require_admin;
use routes::{
    add_handler, categories_handler, delete_handler, list_handler, reorder_handler,
    reposition_handler,
};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let admin = Router::new()
        .route("/featured-categories/add", post(add_handler))
        .route("/featured-categories/reorder", put(reorder_handler))
        .route(
            "/featured-categories/{id}",
            put(reposition_handler).delete(delete_handler),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/featured-categories", get(list_handler))
        .route("/categories", get(categories_handler))
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
