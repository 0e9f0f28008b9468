//! Item CRUD handlers.
//!
//! Every route here sits behind the bearer-token middleware; handlers can
//! assume an authenticated principal.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::debug;

use crate::application::items::ItemInput;

use super::item_to_api;
use crate::infra::http::error::ApiError;
use crate::infra::http::middleware::AuthPrincipal;
use crate::infra::http::models::{ItemPayload, ItemResponse};
use crate::infra::http::state::AppState;

pub async fn list_items(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.items.list().await.map_err(item_to_api)?;
    let items: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
    Ok(Json(items))
}

pub async fn retrieve_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.items.retrieve(id).await.map_err(item_to_api)?;
    Ok(Json(ItemResponse::from(item)))
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(payload): Json<ItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .items
        .create(ItemInput {
            name: payload.name,
            description: payload.description,
        })
        .await
        .map_err(item_to_api)?;

    debug!(
        target: "curio::http::items",
        user_id = principal.user_id,
        item_id = item.id,
        "item created"
    );
    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .items
        .update(
            id,
            ItemInput {
                name: payload.name,
                description: payload.description,
            },
        )
        .await
        .map_err(item_to_api)?;

    debug!(
        target: "curio::http::items",
        user_id = principal.user_id,
        item_id = id,
        "item updated"
    );
    Ok(Json(ItemResponse::from(item)))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.items.delete(id).await.map_err(item_to_api)?;

    debug!(
        target: "curio::http::items",
        user_id = principal.user_id,
        item_id = id,
        "item deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
