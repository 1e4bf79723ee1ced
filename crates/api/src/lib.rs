//! # Courtside API
//!
//! The API crate provides the web server for the Courtside reservation service.
//! It exposes JSON endpoints for accounts, the facility and activity catalog,
//! time slots, reservations, staff shifts, settings and reports.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Validate requests, check roles and call the db crate
//! - **Middleware**: Session extraction, password hashing and error mapping
//! - **Config**: Environment configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Authentication, session and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Cached system settings
pub mod settings_cache;

use std::{sync::Arc, time::Duration};

use axum::{http::HeaderValue, Router};
use chrono_tz::Tz;
use courtside_core::{booking::BookingPolicy, errors::CourtResult};
use courtside_db::repositories::settings::{PgSettingsStore, SettingsStore};
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::{config::ApiConfig, settings_cache::SettingsCache};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    pub config: ApiConfig,
    pub settings: SettingsCache,
}

impl ApiState {
    pub fn new(config: ApiConfig, db_pool: PgPool) -> Self {
        let store = Arc::new(PgSettingsStore::new(db_pool.clone()));
        Self::with_settings_store(config, db_pool, store)
    }

    pub fn with_settings_store(
        config: ApiConfig,
        db_pool: PgPool,
        store: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            db_pool,
            config,
            settings: SettingsCache::new(store),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }

    /// Booking policy built from the current settings.
    pub async fn booking_policy(&self) -> CourtResult<BookingPolicy> {
        self.settings.policy(self.config.timezone).await
    }
}

/// Builds the application router with every route and the shared state attached.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::auth::routes())
        .merge(routes::users::routes())
        .merge(routes::facilities::routes())
        .merge(routes::activities::routes())
        .merge(routes::time_slots::routes())
        .merge(routes::reservations::routes())
        .merge(routes::shifts::routes())
        .merge(routes::settings::routes())
        .merge(routes::reports::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// This function sets up logging, builds the router, layers request tracing,
/// CORS and the request timeout on top, and serves until the process stops.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = courtside_api::config::ApiConfig::from_env()?;
/// let db_pool = courtside_db::create_pool(&config.database_url).await?;
/// courtside_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr = config.server_addr();
    let timeout = Duration::from_secs(config.request_timeout);
    let cors = config.cors_origins.as_deref().map(cors_layer);

    let state = Arc::new(ApiState::new(config, db_pool));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match cors {
        Some(cors) => app.layer(cors),
        None => app,
    };

    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(timeout)),
    );

    // Start the HTTP server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(origins)
        .allow_credentials(true)
}
