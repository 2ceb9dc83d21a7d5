//! # Brewline API
//!
//! The API crate provides the web server for the Brewline coffee ordering
//! storefront. It serves the public menu, pickup locations and pickup slots,
//! takes and confirms paid orders, and exposes the admin and counter views.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like authentication and error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Shop-local time conversions
pub mod clock;
/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Payment gateway client and signature checks
pub mod payments;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::{
    clock::ShopClock,
    config::{ApiConfig, AppEnv},
    middleware::auth::SessionSigner,
    payments::{PaymentGateway, RazorpayGateway},
};

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// # use brewline_api::{config::ApiConfig, ApiState};
/// # async fn example(config: ApiConfig) -> eyre::Result<()> {
/// let db_pool = brewline_db::create_pool(&config.database_url).await?;
/// let state = std::sync::Arc::new(ApiState::from_config(&config, db_pool));
/// let app = brewline_api::build_router(state);
/// # Ok(())
/// # }
/// ```
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,

    /// Issues and checks admin and customer session tokens
    pub sessions: SessionSigner,

    /// Payment gateway used to open and confirm order payments
    pub payments: Arc<dyn PaymentGateway>,

    /// The shop's wall clock
    pub clock: ShopClock,

    pub app_env: AppEnv,
}

impl ApiState {
    pub fn from_config(config: &ApiConfig, db_pool: PgPool) -> Self {
        Self {
            db_pool,
            sessions: SessionSigner::new(&config.session_secret),
            payments: Arc::new(RazorpayGateway::new(config.gateway.clone())),
            clock: ShopClock::new(config.shop_timezone),
            app_env: config.app_env,
        }
    }

    /// Session cookies are marked `Secure` outside development.
    pub fn secure_cookies(&self) -> bool {
        !self.app_env.is_development()
    }
}

/// Builds the application router with every endpoint attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Public storefront endpoints
        .merge(routes::menu::routes())
        .merge(routes::locations::routes())
        .merge(routes::timeslots::routes())
        .merge(routes::cart::routes())
        .merge(routes::orders::routes())
        // Login endpoints
        .merge(routes::auth::routes())
        // Staff endpoints
        .merge(routes::admin::routes())
        .merge(routes::counter::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, builds the shared state and routes, and
/// serves HTTP until the process is stopped.
pub async fn start_server(config: ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if config.gateway.key_id.is_none() || config.gateway.key_secret.is_none() {
        warn!("Payment gateway credentials are not set; checkout will fail");
    }

    let state = Arc::new(ApiState::from_config(&config, db_pool));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(TraceLayer::new_for_http());

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{} ({})", addr, config.shop_timezone);
    axum::serve(listener, app).await?;

    Ok(())
}
