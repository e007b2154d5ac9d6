// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
	pub status: String,
	pub timestamp: String,
	pub duration_ms: u64,
	pub version: String,
	pub database: String,
}

#[utoipa::path(
	get,
	path = "/health",
	responses(
		(status = 200, description = "System is healthy", body = HealthResponse),
		(status = 503, description = "System is unhealthy", body = HealthResponse)
	),
	tag = "health"
)]
/// GET /health - Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	use tokio::time::Instant;

	let start = Instant::now();

	let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
		.fetch_one(&state.pool)
		.await
	{
		Ok(_) => "ok".to_string(),
		Err(e) => {
			tracing::error!(error = %e, "health check: database unreachable");
			"unreachable".to_string()
		}
	};

	let healthy = database == "ok";
	let response = HealthResponse {
		status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
		timestamp: chrono::Utc::now().to_rfc3339(),
		duration_ms: start.elapsed().as_millis() as u64,
		version: env!("CARGO_PKG_VERSION").to_string(),
		database,
	};

	let http_status = if healthy {
		StatusCode::OK
	} else {
		StatusCode::SERVICE_UNAVAILABLE
	};

	(http_status, Json(response))
}
