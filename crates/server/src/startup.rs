use std::net::SocketAddr;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use service::auth::TokenVerifier;
use service::boosts::domain::BoostSettings;
use service::repo::Repositories;
use service::{Marketplace, MarketplaceSettings};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;

/// Allow any origin when none are configured, otherwise only the listed ones
/// (with credentials, so the `auth_token` cookie is sent).
pub fn build_cors(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::very_permissive());
    }
    let allowed = origins
        .iter()
        .map(|o| HeaderValue::from_str(o.trim()).with_context(|| format!("invalid CORS origin `{o}`")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn marketplace_settings(cfg: &AppConfig) -> MarketplaceSettings {
    MarketplaceSettings {
        boost: BoostSettings {
            price_minor: cfg.marketplace.boost_price_minor,
            currency: cfg.marketplace.currency.clone(),
            duration_days: cfg.marketplace.boost_duration_days,
        },
        channel_capacity: Some(cfg.realtime.channel_capacity),
    }
}

/// Select the storage backend, run migrations when asked, and assemble state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let repos = match cfg.database.backend {
        StorageBackend::Memory => {
            warn!("using in-memory storage; data is lost on restart");
            Repositories::in_memory()
        }
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None).await?;
                info!("migrations applied");
            }
            Repositories::seaorm(db)
        }
    };
    let market = Marketplace::new(repos, marketplace_settings(cfg));
    let tokens = TokenVerifier::new(&cfg.auth.jwt_secret, cfg.auth.issuer.as_deref());
    Ok(ServerState::new(market, tokens))
}

pub fn build_app(state: ServerState, cors_origins: &[String]) -> anyhow::Result<Router> {
    Ok(routes::build_router(state, build_cors(cors_origins)?))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = build_app(state, &cfg.server.cors_origins)?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, backend = ?cfg.database.backend, "starting marketplace server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
