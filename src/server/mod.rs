use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use clap::Args;
use sqlx::PgPool;
use tracing::Instrument;

use crate::config::AppConfig;
use crate::shopping::db::PgStore;
use crate::telemetry::{self};
use crate::telemetry::ops::serve::Phase as ServePhase;

pub mod error;
pub mod handlers;

use handlers::AppState;

/// foyer serve
#[derive(Args)]
pub struct ServeCmd {
    /// Listen address; overrides FOYER_BIND
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/recipes/generate-shopping-list", post(handlers::generate_shopping_list))
        .route("/recipes/shopping-list-preview", post(handlers::preview_shopping_list))
        .with_state(state)
}

pub async fn run(pool: &PgPool, cfg: &AppConfig, args: ServeCmd) -> Result<()> {
    let log = telemetry::serve();
    let bind = args.bind.unwrap_or(cfg.bind);
    let root = log.root_span_kv([("bind", bind.to_string())]);

    async {
        let app = router(AppState::new(Arc::new(PgStore::new(pool.clone()))));
        let listener = tokio::net::TcpListener::bind(bind)
            .instrument(log.span(&ServePhase::Bind))
            .await
            .with_context(|| format!("failed to bind {bind}"))?;
        log.info(format!("🚀 Listening on http://{}", bind));

        axum::serve(listener, app).await.context("http server failed")
    }
    .instrument(root)
    .await
}
