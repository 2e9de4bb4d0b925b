use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    payloads::{AddRequest, ReorderPayload, RepositionRequest, normalize_updates},
    state::State,
};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|_| AppError::MalformedPayload)
}

fn success() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "success": true })))
}

pub async fn list_handler(AxumState(state): AxumState<Arc<State>>) -> Result<impl IntoResponse, AppError> {
    let items = state.featured.list().await?;

    Ok(Json(json!({ "items": items })))
}

pub async fn categories_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.featured.categories().await?;

    Ok(Json(json!({ "categories": categories })))
}

pub async fn add_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<AddRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let category_id = body(payload)?
        .category_id
        .filter(|id| !id.is_empty())
        .ok_or(AppError::InvalidInput("Missing categoryId"))?;

    let entry = state.featured.add(&category_id).await?;

    Ok(Json(json!({ "success": true, "entry": entry })))
}

pub async fn reposition_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
    payload: Result<Json<RepositionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let desired = body(payload)?.desired()?;

    state.featured.reposition(&id, desired).await?;

    Ok(success())
}

pub async fn delete_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.featured.delete(&id).await?;

    Ok(success())
}

pub async fn reorder_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<ReorderPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let updates = normalize_updates(body(payload)?.into_updates());

    state.featured.reorder(&updates).await?;

    Ok(success())
}
