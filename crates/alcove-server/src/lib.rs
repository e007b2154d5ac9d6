// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Alcove widget authentication server.
//!
//! This crate provides the HTTP server that issues and verifies signed
//! widget tokens and serves the embeddable widget scripts to allow-listed
//! origins.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod routes;
pub mod widget_auth;
pub mod widget_script;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use alcove_server_config::ServerConfig;
pub use widget_auth::{DomainAllowList, WidgetAuthError};
