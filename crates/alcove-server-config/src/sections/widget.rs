// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Widget authentication configuration.
//!
//! The signing secret is deliberately not part of the TOML layer; it is
//! loaded from `ALCOVE_SERVER_WIDGET_SECRET` (or `..._FILE`) at finalize time
//! so it never lands in a config file or in `Debug` output.

use alcove_common_secret::SecretString;
use serde::Deserialize;

/// Widget authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct WidgetConfig {
	/// Shared HMAC signing secret for widget tokens.
	pub secret: SecretString,
	/// Upper bound on one allow-list lookup before the request fails closed.
	pub lookup_timeout_ms: u64,
}

impl Default for WidgetConfig {
	fn default() -> Self {
		Self {
			secret: SecretString::from(""),
			lookup_timeout_ms: 2000,
		}
	}
}

/// Widget configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetConfigLayer {
	#[serde(default)]
	pub lookup_timeout_ms: Option<u64>,
}

impl WidgetConfigLayer {
	pub fn merge(&mut self, other: WidgetConfigLayer) {
		if other.lookup_timeout_ms.is_some() {
			self.lookup_timeout_ms = other.lookup_timeout_ms;
		}
	}

	pub fn finalize(self, secret: SecretString) -> WidgetConfig {
		WidgetConfig {
			secret,
			lookup_timeout_ms: self.lookup_timeout_ms.unwrap_or(2000),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_timeout() {
		let config = WidgetConfigLayer::default().finalize(SecretString::from("s"));
		assert_eq!(config.lookup_timeout_ms, 2000);
	}

	#[test]
	fn test_custom_timeout() {
		let layer = WidgetConfigLayer {
			lookup_timeout_ms: Some(500),
		};
		let config = layer.finalize(SecretString::from("s"));
		assert_eq!(config.lookup_timeout_ms, 500);
	}

	#[test]
	fn test_debug_does_not_leak_secret() {
		let config = WidgetConfigLayer::default().finalize(SecretString::from("hunter2"));
		let rendered = format!("{config:?}");
		assert!(!rendered.contains("hunter2"));
	}
}
