// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;
use std::time::Duration;

use alcove_common_token::WidgetTokenCodec;
use alcove_server_config::ServerConfig;
use alcove_server_db::{AssetRepository, WidgetDomainRepository};
use axum::{
	routing::{delete, get, post},
	Router,
};
use sqlx::SqlitePool;

use crate::{routes, widget_auth::DomainAllowList};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub codec: Arc<WidgetTokenCodec>,
	pub domain_repo: Arc<WidgetDomainRepository>,
	pub asset_repo: Arc<AssetRepository>,
	pub allow_list: Arc<DomainAllowList>,
	/// Base URL used in rendered scripts when the request has no Host header.
	pub fallback_base_url: String,
	pub pool: SqlitePool,
}

/// Creates the application state from a connected pool and resolved config.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let codec = Arc::new(WidgetTokenCodec::new(config.widget.secret.clone()));
	let domain_repo = Arc::new(WidgetDomainRepository::new(pool.clone()));
	let asset_repo = Arc::new(AssetRepository::new(pool.clone()));
	let allow_list = Arc::new(DomainAllowList::new(
		domain_repo.clone(),
		Duration::from_millis(config.widget.lookup_timeout_ms),
	));

	AppState {
		codec,
		domain_repo,
		asset_repo,
		allow_list,
		fallback_base_url: config.http.base_url.clone(),
		pool,
	}
}

/// Build the HTTP router. All routes are public; the widget endpoints carry
/// their own token-based authorization, and the management API sits behind
/// the dashboard's authenticating proxy.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		// Widget script endpoints (token + origin checked per request)
		.route("/widget.js", get(routes::widget::get_widget_script))
		.route("/widget/gallery.js", get(routes::widget::get_gallery_script))
		// Management API
		.route("/api/widget/token", post(routes::tokens::mint_widget_token))
		.route(
			"/api/widget/domains/{account_id}",
			get(routes::domains::list_domains),
		)
		.route(
			"/api/widget/domains/{account_id}",
			post(routes::domains::add_domain),
		)
		.route(
			"/api/widget/domains/{account_id}",
			delete(routes::domains::remove_domain),
		)
		// Health
		.route("/health", get(routes::health::health_check))
		.with_state(state)
}
