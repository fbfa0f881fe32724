//! Route modules for the PDF to Markdown server

pub mod convert;
pub mod health;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    // Any origin, method and header, with credentials. The request's own
    // values are echoed back since `*` is not allowed with credentials.
    let cors = CorsLayer::very_permissive();

    Router::new()
        .merge(health::router())
        .merge(convert::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
