//! Shared response helpers for HTTP handlers.

use crate::{ApiResponse, AppState};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// 200 with the standard success envelope
pub fn success_response<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

/// 201 with the standard success envelope
pub fn created_response<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Resolves a page/limit query against the configured defaults.
pub fn pagination(state: &AppState, page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = crate::common::clamp_page_size(
        limit.unwrap_or(0),
        state.config.api_default_page_size as u64,
        state.config.api_max_page_size as u64,
    );
    (page, limit)
}
