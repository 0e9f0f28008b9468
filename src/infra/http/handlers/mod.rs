mod auth;
mod items;

pub use auth::{login, register};
pub use items::{create_item, delete_item, list_items, retrieve_item, update_item};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::auth::AuthError;
use crate::application::items::ItemError;

use super::error::{ApiError, ErrorReport};
use super::state::AppState;

pub(super) fn auth_to_api(err: AuthError) -> ApiError {
    match err {
        AuthError::Validation(fields) => ApiError::validation(fields),
        AuthError::InvalidCredentials => ApiError::invalid_credentials(),
        AuthError::Hashing(detail) => ApiError::internal(detail),
        AuthError::Repo(err) => ApiError::internal(err.to_string()),
        AuthError::Token(err) => ApiError::internal(err.to_string()),
    }
}

pub(super) fn item_to_api(err: ItemError) -> ApiError {
    match err {
        ItemError::Validation(fields) => ApiError::validation(fields),
        ItemError::NotFound => ApiError::not_found("Item not found"),
        ItemError::Repo(err) => ApiError::internal(err.to_string()),
    }
}

pub async fn health(State(state): State<AppState>) -> Response {
    match state.db.health_check().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_message(
                "infra::http::health",
                StatusCode::SERVICE_UNAVAILABLE,
                err.to_string(),
            )
            .attach(&mut response);
            response
        }
    }
}
