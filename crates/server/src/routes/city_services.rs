use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use service::city_service::{CityService, CityServicePatch, Conditional, NewCityService};
use tracing::{info, warn};

use crate::{errors::ApiError, state::AppState};

/// Conditional responses must be revalidated on every use.
pub const CACHE_CONTROL_VALUE: &str = "private, max-age=0, must-revalidate";

// Non-numeric ids never match a record.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| ApiError::not_found("Service not found"))
}

fn cache_headers(etag: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(etag)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    headers.insert(header::ETAG, value);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    Ok(headers)
}

#[utoipa::path(
    get, path = "/city_services", tag = "city_services",
    responses((status = 200, description = "All services", body = [crate::openapi::CityServiceDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CityService>>, ApiError> {
    let list = state.services.list().await?;
    info!(count = list.len(), "list city services");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/city_services/{name}", tag = "city_services",
    params(
        ("name" = String, Path, description = "Exact service name"),
        ("If-None-Match" = Option<String>, Header, description = "Previously issued ETag")
    ),
    responses(
        (status = 200, description = "Found", body = crate::openapi::CityServiceDoc),
        (status = 304, description = "Not Modified"),
        (status = 400, description = "Invalid name", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let if_none_match = headers.get(header::IF_NONE_MATCH).and_then(|v| v.to_str().ok());
    match state.services.get_by_name_conditional(&name, if_none_match).await? {
        Conditional::NotModified { etag } => Ok((StatusCode::NOT_MODIFIED, cache_headers(&etag)?).into_response()),
        Conditional::Modified { record, etag } => Ok((StatusCode::OK, cache_headers(&etag)?, Json(record)).into_response()),
    }
}

#[utoipa::path(
    post, path = "/city_services", tag = "city_services",
    request_body = crate::openapi::NewCityServiceDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CityServiceDoc),
        (status = 400, description = "Missing name", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Duplicate name", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewCityService>, JsonRejection>,
) -> Result<(StatusCode, Json<CityService>), ApiError> {
    let Json(input) = body.map_err(|rej| {
        warn!(error = %rej.body_text(), "rejected create body");
        ApiError::bad_request("Service name required")
    })?;
    let created = state.services.create(input).await?;
    // 记录已写入；事件构造失败只记日志，不影响 201
    match created.created_event() {
        Ok(event) => {
            let delivered = state.notifier.broadcast(&event);
            info!(id = created.id, listeners = delivered, "service.created broadcast");
        }
        Err(e) => warn!(id = created.id, error = %e, "service.created not broadcast"),
    }
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/city_services/{id}", tag = "city_services",
    params(("id" = i32, Path, description = "Service ID")),
    request_body = crate::openapi::CityServicePatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CityServiceDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Duplicate name", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CityServicePatch>, JsonRejection>,
) -> Result<Json<CityService>, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = body?;
    Ok(Json(state.services.update(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/city_services/{id}", tag = "city_services",
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.services.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
