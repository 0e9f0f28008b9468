//! Registration and login handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::auth::{LoginCommand, RegisterCommand};

use super::auth_to_api;
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{LoginRequest, RegisterRequest, RegisteredUser, TokenResponse};
use crate::infra::http::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .auth
        .register(RegisterCommand {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await
        .map_err(auth_to_api)?;

    Ok((StatusCode::CREATED, Json(RegisteredUser::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let access = state
        .auth
        .login(LoginCommand {
            email: payload.email,
            password: payload.password,
        })
        .await
        .map_err(auth_to_api)?;

    Ok(Json(TokenResponse { access }))
}
