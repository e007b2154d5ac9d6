// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Widget allow-list management.
//!
//! Origins are validated and normalized on the way in, so the per-request
//! check in `widget_auth` can rely on exact string equality.

use alcove_server_db::DbError;
use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use serde::{Deserialize, Serialize};

use crate::{
	api::AppState,
	api_response::{bad_request, conflict, internal_error, not_found, ApiError},
	widget_auth::normalize_origin,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DomainRequest {
	pub domain: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DomainResponse {
	pub account_id: String,
	pub domain: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DomainListResponse {
	pub account_id: String,
	pub domains: Vec<String>,
}

#[utoipa::path(
	get,
	path = "/api/widget/domains/{account_id}",
	params(
		("account_id" = String, Path, description = "Account ID")
	),
	responses(
		(status = 200, description = "Registered origins", body = DomainListResponse),
		(status = 500, description = "Lookup failed", body = ApiError)
	),
	tag = "widget-admin"
)]
/// GET /api/widget/domains/{account_id} - List an account's allowed origins.
pub async fn list_domains(
	State(state): State<AppState>,
	Path(account_id): Path<String>,
) -> impl IntoResponse {
	match state.domain_repo.list_domains_for_account(&account_id).await {
		Ok(domains) => Json(DomainListResponse {
			account_id,
			domains,
		})
		.into_response(),
		Err(e) => {
			tracing::error!(error = %e, account_id, "failed to list widget domains");
			internal_error("failed to list domains").into_response()
		}
	}
}

#[utoipa::path(
	post,
	path = "/api/widget/domains/{account_id}",
	params(
		("account_id" = String, Path, description = "Account ID")
	),
	request_body = DomainRequest,
	responses(
		(status = 201, description = "Origin registered", body = DomainResponse),
		(status = 400, description = "Not a valid origin", body = ApiError),
		(status = 409, description = "Origin already registered", body = ApiError),
		(status = 500, description = "Write failed", body = ApiError)
	),
	tag = "widget-admin"
)]
/// POST /api/widget/domains/{account_id} - Register an allowed origin.
pub async fn add_domain(
	State(state): State<AppState>,
	Path(account_id): Path<String>,
	Json(payload): Json<DomainRequest>,
) -> impl IntoResponse {
	let Some(origin) = normalize_origin(&payload.domain) else {
		return bad_request(
			"invalid_domain",
			"domain must be a valid origin such as https://example.com",
		)
		.into_response();
	};

	match state.domain_repo.add_domain(&account_id, &origin).await {
		Ok(_) => (
			StatusCode::CREATED,
			Json(DomainResponse {
				account_id,
				domain: origin,
			}),
		)
			.into_response(),
		Err(DbError::Conflict(_)) => conflict(
			"domain_exists",
			"this origin is already registered for the account",
		)
		.into_response(),
		Err(e) => {
			tracing::error!(error = %e, account_id, "failed to register widget domain");
			internal_error("failed to register domain").into_response()
		}
	}
}

#[utoipa::path(
	delete,
	path = "/api/widget/domains/{account_id}",
	params(
		("account_id" = String, Path, description = "Account ID")
	),
	request_body = DomainRequest,
	responses(
		(status = 200, description = "Origin removed", body = DomainResponse),
		(status = 400, description = "Not a valid origin", body = ApiError),
		(status = 404, description = "Origin was not registered", body = ApiError),
		(status = 500, description = "Write failed", body = ApiError)
	),
	tag = "widget-admin"
)]
/// DELETE /api/widget/domains/{account_id} - Remove an allowed origin.
pub async fn remove_domain(
	State(state): State<AppState>,
	Path(account_id): Path<String>,
	Json(payload): Json<DomainRequest>,
) -> impl IntoResponse {
	let Some(origin) = normalize_origin(&payload.domain) else {
		return bad_request(
			"invalid_domain",
			"domain must be a valid origin such as https://example.com",
		)
		.into_response();
	};

	match state.domain_repo.remove_domain(&account_id, &origin).await {
		Ok(true) => Json(DomainResponse {
			account_id,
			domain: origin,
		})
		.into_response(),
		Ok(false) => not_found("this origin is not registered for the account").into_response(),
		Err(e) => {
			tracing::error!(error = %e, account_id, "failed to remove widget domain");
			internal_error("failed to remove domain").into_response()
		}
	}
}
