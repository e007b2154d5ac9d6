// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for the widget server.

use utoipa::OpenApi;

use crate::api_response::ApiError;
use crate::routes::domains::{DomainListResponse, DomainRequest, DomainResponse};
use crate::routes::health::HealthResponse;
use crate::routes::tokens::{MintTokenRequest, TokenResponse};

#[derive(OpenApi)]
#[openapi(
	paths(
		crate::routes::widget::get_widget_script,
		crate::routes::widget::get_gallery_script,
		crate::routes::tokens::mint_widget_token,
		crate::routes::domains::list_domains,
		crate::routes::domains::add_domain,
		crate::routes::domains::remove_domain,
		crate::routes::health::health_check,
	),
	components(schemas(
		ApiError,
		DomainListResponse,
		DomainRequest,
		DomainResponse,
		HealthResponse,
		MintTokenRequest,
		TokenResponse,
	)),
	tags(
		(name = "widget", description = "Public widget script endpoints"),
		(name = "widget-admin", description = "Widget token and allow-list management"),
		(name = "health", description = "Service health")
	)
)]
pub struct ApiDoc;
