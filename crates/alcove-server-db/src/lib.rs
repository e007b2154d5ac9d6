// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Database access for the Alcove widget server.
//!
//! SQLite-backed repositories for the widget origin allow-list and uploaded
//! asset metadata, plus pool construction and startup migrations.

pub mod asset;
pub mod error;
pub mod pool;
pub mod testing;
pub mod widget_domain;

pub use asset::{Asset, AssetRepository, AssetStore};
pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use widget_domain::{WidgetDomainRepository, WidgetDomainStore};
