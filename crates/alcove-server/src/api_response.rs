// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! API response helpers for the JSON management endpoints.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Error body shared by all management endpoints.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ApiError {
	pub error: String,
	pub message: String,
}

impl ApiError {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}

/// Create a 400 Bad Request response.
pub fn bad_request(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<ApiError>) {
	(StatusCode::BAD_REQUEST, Json(ApiError::new(error, message)))
}

/// Create a 404 Not Found response.
pub fn not_found(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
	(
		StatusCode::NOT_FOUND,
		Json(ApiError::new("not_found", message)),
	)
}

/// Create a 409 Conflict response.
pub fn conflict(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<ApiError>) {
	(StatusCode::CONFLICT, Json(ApiError::new(error, message)))
}

/// Create a 500 Internal Server Error response.
pub fn internal_error(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(ApiError::new("internal_error", message)),
	)
}
