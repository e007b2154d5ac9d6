// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret wrapper type that prevents accidental logging of sensitive values.
//!
//! [`Secret<T>`] redacts its contents from `Debug` and `Display` output and
//! zeroizes the inner value on drop. Access to the wrapped value is explicit
//! via [`Secret::expose_secret`], which keeps secret reads grep-able.
//!
//! [`load_secret_env`] loads secrets from the environment with `*_FILE`
//! indirection support for file-mounted secrets.

pub mod env;
mod secret;

pub use env::{load_secret_env, require_secret_env, SecretEnvError};
pub use secret::{Secret, SecretString, REDACTED};
