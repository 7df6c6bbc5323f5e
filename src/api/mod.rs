// src/api/mod.rs - HTTP surface: router assembly and shared state
//
// Grounded in src/main.rs's create_router/start_server shape, trimmed of
// its demo-data and ApiResponse wrapper since §6 specifies exact response
// bodies per endpoint rather than a generic success/data/message envelope.

pub mod dto;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalogue::CatalogueAdapter;

pub struct AppState {
    pub catalogue: Arc<dyn CatalogueAdapter>,
}

pub fn create_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/calculate", post(handlers::calculate))
        .route("/check-portions", post(handlers::check_portions))
        .route("/menus", get(handlers::list_menus))
        .route("/menus/:id/price-check", post(handlers::price_check))
        .route("/menus/:id/preview", get(handlers::preview))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
}
