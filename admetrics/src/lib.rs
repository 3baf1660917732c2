//! # admetrics: Campaign Spend Analytics Service
//!
//! `admetrics` is a small HTTP service for evaluating marketing-campaign
//! performance. Callers submit spend and revenue figures; the service
//! computes return on investment and cost-per-acquisition, selects a
//! qualitative spend recommendation, persists the submission, and returns
//! recent history alongside the fresh metrics.
//!
//! ## Overview
//!
//! The service exposes two endpoints. `POST /analyze` validates a
//! submission, derives its metrics, writes one immutable record, and
//! responds with the formatted metrics, a recommendation, and the five
//! most-recent prior records for the same scope. `GET /history` returns the
//! ten most-recent records, optionally filtered by a free-text `userId`
//! correlation key. Records are never updated or deleted.
//!
//! Requests are independent and stateless: the only shared state is the
//! PostgreSQL connection pool, the loaded configuration, and the rate
//! limiter buckets, all owned by [`AppState`] and constructed once at
//! startup. Concurrent-write durability and read consistency are left
//! entirely to PostgreSQL; the service adds no cross-request ordering
//! guarantees beyond newest-first reads.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL via SQLx for persistence.
//!
//! The **API layer** ([`api`]) holds the route handlers and the wire models
//! (camelCase JSON, formatted metric strings). The **computation core**
//! ([`metrics`]) is a set of pure functions for ROI, CPA, suggestion
//! selection, and formatting. The **database layer** ([`db`]) follows the
//! repository pattern with a single repository over the `analyses` table.
//! Cross-cutting middleware covers shared-secret gating ([`auth`]), request
//! rate limiting ([`limits`]), CORS, and security headers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use admetrics::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = admetrics::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     admetrics::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod limits;
pub mod metrics;
pub mod openapi;
pub mod telemetry;

#[cfg(test)]
pub mod test_utils;

use crate::config::CorsOrigin;
use crate::limits::Limiters;
use crate::openapi::ApiDoc;
use axum::http::{HeaderValue, header};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// Constructed once in [`Application::new`] and injected into handlers via
/// axum's `State` extractor; there is no other process-wide state.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub limiters: Limiters,
}

/// Get the admetrics database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let has_wildcard = config.cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard));

    // A wildcard cannot appear inside an origin list; config validation
    // already forbids combining it with credentials.
    let mut cors = if has_wildcard {
        CorsLayer::new().allow_origin(tower_http::cors::Any)
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Serialize the origin itself; Url's string form carries a
                // trailing slash that browsers never send.
                origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        CorsLayer::new().allow_origin(origins).allow_credentials(config.cors.allow_credentials)
    };

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// The analysis endpoints sit behind the rate limiter and the optional
/// shared-secret gate; health and docs stay open. CORS, security headers,
/// and request tracing wrap the whole router.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    // Analysis endpoints. Layer order matters: the rate limiter is applied
    // last so it runs first, before the API key check.
    let api_routes = Router::new()
        .route("/analyze", post(api::handlers::analyses::analyze))
        .route("/history", get(api::handlers::analyses::history))
        .layer(from_fn_with_state(state.clone(), auth::require_api_key))
        .layer(from_fn_with_state(state.clone(), limits::rate_limit_middleware))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Create CORS layer from config
    let cors_layer = create_cors_layer(&state.config)?;

    let router = router
        .layer(cors_layer)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects the pool, runs migrations,
///    and builds the router
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown future resolves
/// 3. **Shutdown**: the pool is closed after the server drains
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application around an existing pool (used by tests) or
    /// connect a fresh one from configuration.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        tracing::debug!("Starting admetrics with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => pool,
            None => {
                let settings = &config.database.pool;
                let mut options = PgPoolOptions::new()
                    .max_connections(settings.max_connections)
                    .min_connections(settings.min_connections)
                    .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));
                // 0 means "never" for both timeouts
                if settings.idle_timeout_secs > 0 {
                    options = options.idle_timeout(Duration::from_secs(settings.idle_timeout_secs));
                }
                if settings.max_lifetime_secs > 0 {
                    options = options.max_lifetime(Duration::from_secs(settings.max_lifetime_secs));
                }
                options.connect(&config.database.url).await?
            }
        };

        migrator().run(&pool).await?;

        let state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .limiters(Limiters::new(&config.rate_limit))
            .build();

        let router = build_router(&state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "admetrics listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown; connect info feeds the
        // per-client rate limiter keys.
        axum::serve(listener, self.router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown)
            .await?;

        // Close database connections
        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
