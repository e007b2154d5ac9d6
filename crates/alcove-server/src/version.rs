// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Version reporting for the `version` subcommand.

/// Human-readable version and build information.
pub fn format_version_info() -> String {
	format!(
		"{} {}\ncommit: {}\n",
		env!("CARGO_PKG_NAME"),
		env!("CARGO_PKG_VERSION"),
		option_env!("ALCOVE_BUILD_COMMIT").unwrap_or("unknown"),
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_version_info_contains_package_version() {
		assert!(format_version_info().contains(env!("CARGO_PKG_VERSION")));
	}
}
