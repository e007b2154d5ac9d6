// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Alcove widget server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`ALCOVE_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use alcove_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use alcove_common_secret::load_secret_env;
use tracing::{debug, info};

/// Environment variable holding the widget token signing secret.
pub const WIDGET_SECRET_ENV: &str = "ALCOVE_SERVER_WIDGET_SECRET";

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub widget: WidgetConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`ALCOVE_SERVER_*`)
/// 2. Config file (`/etc/alcove/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	// The signing secret is mandatory: without it every widget token would be
	// unverifiable and the widget endpoint would reject all traffic. Refuse
	// to start instead.
	let widget_secret = load_secret_env(WIDGET_SECRET_ENV)
		.map_err(|e| ConfigError::Secret(e.to_string()))?
		.ok_or_else(|| {
			ConfigError::Secret(format!(
				"{WIDGET_SECRET_ENV} is required; widget token verification fails closed without it"
			))
		})?;
	let widget = layer.widget.unwrap_or_default().finalize(widget_secret);

	validate_config(&widget)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		lookup_timeout_ms = widget.lookup_timeout_ms,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		widget,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(widget: &WidgetConfig) -> Result<(), ConfigError> {
	if widget.secret.is_empty() {
		return Err(ConfigError::Validation(format!(
			"{WIDGET_SECRET_ENV} must not be empty or whitespace"
		)));
	}

	if widget.lookup_timeout_ms == 0 {
		return Err(ConfigError::Validation(
			"widget.lookup_timeout_ms must be greater than zero; the allow-list lookup \
			 requires a bounded timeout"
				.to_string(),
		));
	}

	Ok(())
}
