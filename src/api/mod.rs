//! HTTP API - the food proxy functions and the auth forms.
//!
//! Every response carries permissive CORS headers. A bare `OPTIONS` on the
//! food routes answers with a plain `ok`.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    handler::Handler,
    http::{HeaderName, Method, header},
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::{
    backend::GoTrueClient,
    config::server::ServiceConfig,
    core::lookup::FoodLookup,
    errors::Result,
};

/// Auth form endpoints
pub mod auth;
/// Error responses
pub mod error;
/// Food proxy endpoints
pub mod food;

use auth::{login_handler, register_handler, reset_password_handler};
use food::{barcode_handler, preflight_handler, search_food_handler};

/// Shared state of the HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// Food database client
    pub lookup: FoodLookup,
    /// Auth service client
    pub auth: GoTrueClient,
}

impl AppState {
    /// Builds both clients from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Arc<Self>> {
        Ok(Arc::new(Self {
            lookup: FoodLookup::from_config(config)?,
            auth: GoTrueClient::from_config(config)?,
        }))
    }
}

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
        .max_age(Duration::from_secs(60 * 60))
}

/// Builds the router with all routes.
///
/// `CorsLayer` answers every `OPTIONS` itself, so on the food routes it wraps
/// only the `GET` handlers and `OPTIONS` reaches [`preflight_handler`].
pub fn router(state: Arc<AppState>) -> Router {
    let food = Router::new()
        .route(
            "/search-food",
            get(search_food_handler.layer(cors())).options(preflight_handler),
        )
        .route(
            "/get-food-by-barcode",
            get(barcode_handler.layer(cors())).options(preflight_handler),
        );

    let forms = Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/reset-password", post(reset_password_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(cors());

    food.merge(forms).with_state(state)
}

/// Serves the API until Ctrl+C or SIGTERM.
pub async fn serve(config: &ServiceConfig, state: Arc<AppState>) -> Result<()> {
    let app = router(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("API running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API shut down");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
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
        () = ctrl_c => {},
        () = terminate => {},
    }
}
