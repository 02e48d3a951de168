use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::ClientStore;

pub mod error;
pub mod handlers;

pub use error::{ApiError, Envelope};

/// Shared by every handler; holds the injected store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClientStore>,
}

/// Build the HTTP router: the `/api/clients` route table plus CORS and
/// request tracing.
pub fn router(store: Arc<dyn ClientStore>, config: &Config) -> Result<Router> {
    let cors = cors_layer(&config.allowed_origin)?;

    let api = Router::new()
        .route(
            "/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/clients/{id}",
            get(handlers::show_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        );

    Ok(Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store }))
}

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("invalid CORS origin {:?}", origin))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}
