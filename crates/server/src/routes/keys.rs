//! Handlers for `/<key>`: the key is the whole remaining path and may
//! contain `/`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use service::kv::domain::DeleteOutcome;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Serialize)]
pub struct StoredOutput {
    pub key: String,
    pub value: serde_json::Value,
}

fn parse_body(body: &Bytes) -> Result<serde_json::Value, JsonApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(JsonApiError::new(StatusCode::BAD_REQUEST, "You need to supply JSON", Some("empty body".into())));
    }
    serde_json::from_slice(body)
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "You need to supply JSON", Some(e.to_string())))
}

#[utoipa::path(
    post, path = "/{key}", tag = "store",
    params(("key" = String, Path, description = "the key you want to store the value at", example = "group1/users/georgina")),
    request_body(content = crate::openapi::JsonDocument, description = "A JSON document to store", content_type = "application/json"),
    responses(
        (status = 200, description = "The key was successfully stored.", body = crate::openapi::StoredOutputDoc),
        (status = 400, description = "The given value was invalid."),
        (status = 403, description = "The key has no forward slash and namespaced keys are required."),
        (status = 500, description = "Failed to store key")
    )
)]
pub async fn store_value(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<StoredOutput>, JsonApiError> {
    let value = parse_body(&body)?;
    if state.require_namespaced_keys && !key.contains('/') {
        return Err(JsonApiError::new(StatusCode::FORBIDDEN, "You must use keys with a forward slash.", None));
    }
    let rec = state
        .store
        .put(&key, &value)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Failed to store key"))?;
    Ok(Json(StoredOutput { key: rec.key, value: rec.value }))
}

#[utoipa::path(
    get, path = "/{key}", tag = "fetch",
    params(("key" = String, Path, description = "the key you want to fetch the value for", example = "group1/users/georgina")),
    responses(
        (status = 200, description = "The JSON document stored at the key.", body = crate::openapi::JsonDocument),
        (status = 404, description = "There was no JSON document stored at the key.")
    )
)]
pub async fn fetch_value(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match state.store.get(&key).await {
        Ok(Some(rec)) => Ok(Json(rec.value)),
        Ok(None) => Err(JsonApiError::not_found()),
        Err(e) => Err(JsonApiError::from_service(e, "internal server error")),
    }
}

#[utoipa::path(
    delete, path = "/{key}", tag = "delete",
    params(("key" = String, Path, description = "the key you want to delete", example = "group1/users/georgina")),
    responses(
        (status = 204, description = "The key was successfully deleted"),
        (status = 404, description = "The key did not exist")
    )
)]
pub async fn delete_value(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    match state.store.delete(&key).await {
        Ok(DeleteOutcome::Deleted { .. }) => Ok(StatusCode::NO_CONTENT),
        Ok(DeleteOutcome::NotFound) => Err(JsonApiError::not_found()),
        Err(e) => Err(JsonApiError::from_service(e, "internal server error")),
    }
}
