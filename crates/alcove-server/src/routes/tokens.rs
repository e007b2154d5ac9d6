// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Widget token issuance.
//!
//! Part of the management surface: the dashboard calls this after a business
//! configures its widget, then bakes the token into the embed snippet.

use alcove_common_token::TokenError;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::{
	api::AppState,
	api_response::{bad_request, ApiError},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MintTokenRequest {
	pub account_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
	pub token: String,
}

#[utoipa::path(
	post,
	path = "/api/widget/token",
	request_body = MintTokenRequest,
	responses(
		(status = 200, description = "Signed widget token", body = TokenResponse),
		(status = 400, description = "Missing or empty account id", body = ApiError)
	),
	tag = "widget-admin"
)]
/// POST /api/widget/token - Issue a signed widget token for an account.
pub async fn mint_widget_token(
	State(state): State<AppState>,
	Json(payload): Json<MintTokenRequest>,
) -> impl IntoResponse {
	match state.codec.issue(payload.account_id.trim()) {
		Ok(token) => {
			tracing::debug!(account_id = %payload.account_id, "widget token issued");
			Json(TokenResponse { token }).into_response()
		}
		Err(TokenError::EmptyAccountId) => bad_request(
			"missing_account_id",
			"account_id must be a non-empty string",
		)
		.into_response(),
	}
}
