use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use common::types::Message;
use serde::Deserialize;

use crate::{errors::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub name: String,
}

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, format!("invalid product id: {raw}")))
}

fn read_body(body: Result<Json<ProductInput>, JsonRejection>) -> Result<ProductInput, ApiError> {
    body.map(|Json(b)| b)
        .map_err(|rej| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, rej.body_text()))
}

#[utoipa::path(get, path = "/products", tag = "products", responses((status = 200, description = "All products", body = [crate::openapi::ProductDoc])))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<models::product::Model>>, ApiError> {
    Ok(Json(state.products.list().await?))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<models::product::Model>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.products.get(id).await?))
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<models::product::Model>), ApiError> {
    let input = read_body(body)?;
    let created = state.products.create(&input.name).await.map_err(ApiError::unprocessable)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<models::product::Model>, ApiError> {
    let id = parse_id(&id)?;
    let input = read_body(body)?;
    let updated = state.products.update(id, &input.name).await.map_err(ApiError::unprocessable)?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id)?;
    state.products.delete(id).await?;
    Ok(Json(Message { message: format!("Deleted product id={id}") }))
}
