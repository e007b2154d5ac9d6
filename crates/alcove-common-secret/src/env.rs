// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment-based secret loading with `*_FILE` indirection.

use std::path::PathBuf;

use crate::SecretString;

#[derive(Debug, thiserror::Error)]
pub enum SecretEnvError {
	#[error("both {var} and {var}_FILE are set; use exactly one")]
	Conflict { var: String },

	#[error("{var} is set but empty")]
	Empty { var: String },

	#[error("failed to read secret file {path} for {var}: {source}")]
	FileRead {
		var: String,
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("required secret {var} is not set")]
	Missing { var: String },
}

/// Load a secret from `var`, or from the file named by `var_FILE`.
///
/// Returns `Ok(None)` when neither variable is set. Values are trimmed of
/// surrounding whitespace; a value that is empty after trimming is an error
/// rather than silently treated as unset.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");
	let direct = std::env::var(var).ok();
	let from_file = std::env::var(&file_var).ok();

	match (direct, from_file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Conflict {
			var: var.to_string(),
		}),
		(Some(value), None) => {
			let trimmed = value.trim();
			if trimmed.is_empty() {
				return Err(SecretEnvError::Empty {
					var: var.to_string(),
				});
			}
			Ok(Some(SecretString::from(trimmed)))
		}
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			tracing::debug!(var, path = %path.display(), "loading secret from file");
			let contents =
				std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
					var: var.to_string(),
					path: path.clone(),
					source,
				})?;
			let trimmed = contents.trim();
			if trimmed.is_empty() {
				return Err(SecretEnvError::Empty {
					var: var.to_string(),
				});
			}
			Ok(Some(SecretString::from(trimmed)))
		}
		(None, None) => Ok(None),
	}
}

/// Like [`load_secret_env`] but errors when the secret is absent.
pub fn require_secret_env(var: &str) -> Result<SecretString, SecretEnvError> {
	load_secret_env(var)?.ok_or_else(|| SecretEnvError::Missing {
		var: var.to_string(),
	})
}
