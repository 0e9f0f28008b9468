pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::AppState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

/// Assemble the full route tree. Item routes sit behind the bearer-token
/// gate; registration, login, and the health probe do not.
pub fn build_router(state: AppState) -> Router {
    let auth_state = state.clone();

    let items = Router::new()
        .route(
            "/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/items/{id}",
            get(handlers::retrieve_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::require_auth,
        ));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/healthz", get(handlers::health))
        .merge(items)
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}
