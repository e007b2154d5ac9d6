// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Widget script endpoints.
//!
//! These are the only endpoints reachable from arbitrary third-party pages.
//! Both run the full decision procedure in [`crate::widget_auth`] before a
//! single byte of script is rendered.

use axum::{
	extract::{Query, State},
	http::{header, HeaderMap, StatusCode},
	response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
	api::AppState,
	widget_auth::authorize_widget_request,
	widget_script,
};

#[derive(Debug, Deserialize)]
pub struct WidgetQuery {
	pub token: Option<String>,
}

/// Derive the server's externally visible base URL from the request.
///
/// Honors `X-Forwarded-Proto` so scripts rendered behind a TLS-terminating
/// proxy point back at https URLs.
fn request_base_url(headers: &HeaderMap, fallback: &str) -> String {
	let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) else {
		return fallback.to_string();
	};
	let proto = headers
		.get("x-forwarded-proto")
		.and_then(|v| v.to_str().ok())
		.unwrap_or("http");
	format!("{proto}://{host}")
}

#[utoipa::path(
	get,
	path = "/widget.js",
	params(
		("token" = Option<String>, Query, description = "Signed widget token")
	),
	responses(
		(status = 200, description = "Chat widget script", content_type = "application/javascript"),
		(status = 400, description = "Missing token, or missing/unparseable origin"),
		(status = 401, description = "Invalid or expired token"),
		(status = 403, description = "Origin not allowed for this account")
	),
	tag = "widget"
)]
/// GET /widget.js - Serve the chat widget to an authorized embedding page.
pub async fn get_widget_script(
	State(state): State<AppState>,
	Query(query): Query<WidgetQuery>,
	headers: HeaderMap,
) -> Response {
	let account_id = match authorize_widget_request(
		&state.codec,
		&state.allow_list,
		query.token.as_deref(),
		&headers,
	)
	.await
	{
		Ok(account_id) => account_id,
		Err(reject) => return reject.into_response(),
	};

	let base_url = request_base_url(&headers, &state.fallback_base_url);
	let script = widget_script::render_widget_script(&account_id, &base_url);

	(
		[(header::CONTENT_TYPE, "application/javascript")],
		script,
	)
		.into_response()
}

#[utoipa::path(
	get,
	path = "/widget/gallery.js",
	params(
		("token" = Option<String>, Query, description = "Signed widget token")
	),
	responses(
		(status = 200, description = "Image gallery script", content_type = "application/javascript"),
		(status = 400, description = "Missing token, or missing/unparseable origin"),
		(status = 401, description = "Invalid or expired token"),
		(status = 403, description = "Origin not allowed for this account")
	),
	tag = "widget"
)]
/// GET /widget/gallery.js - Serve the image gallery for an authorized page.
pub async fn get_gallery_script(
	State(state): State<AppState>,
	Query(query): Query<WidgetQuery>,
	headers: HeaderMap,
) -> Response {
	let account_id = match authorize_widget_request(
		&state.codec,
		&state.allow_list,
		query.token.as_deref(),
		&headers,
	)
	.await
	{
		Ok(account_id) => account_id,
		Err(reject) => return reject.into_response(),
	};

	let assets = match state.asset_repo.list_assets_for_account(&account_id).await {
		Ok(assets) => assets,
		Err(e) => {
			tracing::error!(error = %e, account_id, "failed to load gallery assets");
			return (StatusCode::INTERNAL_SERVER_ERROR, "failed to load gallery").into_response();
		}
	};

	let script = widget_script::render_gallery_script(&assets);

	(
		[(header::CONTENT_TYPE, "application/javascript")],
		script,
	)
		.into_response()
}
