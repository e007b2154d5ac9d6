// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Uploaded asset metadata repository.
//!
//! Only metadata lives here; the asset bytes themselves are in external
//! object storage and referenced by URL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

/// One uploaded asset belonging to an account.
#[derive(Debug, Clone)]
pub struct Asset {
	pub id: String,
	pub account_id: String,
	pub url: String,
	pub name: Option<String>,
	pub uploaded_at: DateTime<Utc>,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
	async fn list_assets_for_account(&self, account_id: &str) -> Result<Vec<Asset>, DbError>;
	async fn insert_asset(
		&self,
		account_id: &str,
		url: &str,
		name: Option<&str>,
	) -> Result<String, DbError>;
}

/// Repository for asset metadata database operations.
#[derive(Clone)]
pub struct AssetRepository {
	pool: SqlitePool,
}

impl AssetRepository {
	/// Create a new asset repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// List an account's assets, newest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_assets_for_account(&self, account_id: &str) -> Result<Vec<Asset>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, account_id, url, name, uploaded_at
			FROM assets
			WHERE account_id = ?
			ORDER BY uploaded_at DESC
			"#,
		)
		.bind(account_id)
		.fetch_all(&self.pool)
		.await?;

		let mut assets = Vec::with_capacity(rows.len());
		for row in &rows {
			assets.push(parse_asset_row(row)?);
		}
		Ok(assets)
	}

	/// Record an uploaded asset.
	///
	/// # Returns
	/// The generated asset ID.
	#[tracing::instrument(skip(self))]
	pub async fn insert_asset(
		&self,
		account_id: &str,
		url: &str,
		name: Option<&str>,
	) -> Result<String, DbError> {
		let id = Uuid::new_v4().to_string();
		let now = Utc::now();

		sqlx::query(
			r#"
			INSERT INTO assets (id, account_id, url, name, uploaded_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(&id)
		.bind(account_id)
		.bind(url)
		.bind(name)
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(asset_id = %id, account_id, "asset recorded");
		Ok(id)
	}
}

#[async_trait]
impl AssetStore for AssetRepository {
	async fn list_assets_for_account(&self, account_id: &str) -> Result<Vec<Asset>, DbError> {
		self.list_assets_for_account(account_id).await
	}

	async fn insert_asset(
		&self,
		account_id: &str,
		url: &str,
		name: Option<&str>,
	) -> Result<String, DbError> {
		self.insert_asset(account_id, url, name).await
	}
}

fn parse_asset_row(row: &sqlx::sqlite::SqliteRow) -> Result<Asset, DbError> {
	let uploaded_at: String = row.get("uploaded_at");
	let uploaded_at = DateTime::parse_from_rfc3339(&uploaded_at)
		.map_err(|e| DbError::Internal(format!("invalid uploaded_at timestamp: {e}")))?
		.with_timezone(&Utc);

	Ok(Asset {
		id: row.get("id"),
		account_id: row.get("account_id"),
		url: row.get("url"),
		name: row.get("name"),
		uploaded_at,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_widget_test_pool;

	#[tokio::test]
	async fn test_list_is_empty_for_unknown_account() {
		let pool = create_widget_test_pool().await;
		let repo = AssetRepository::new(pool);

		let assets = repo.list_assets_for_account("missing").await.unwrap();
		assert!(assets.is_empty());
	}

	#[tokio::test]
	async fn test_insert_then_list() {
		let pool = create_widget_test_pool().await;
		let repo = AssetRepository::new(pool);

		let id = repo
			.insert_asset("abc123", "https://cdn.test/a.png", Some("a.png"))
			.await
			.unwrap();

		let assets = repo.list_assets_for_account("abc123").await.unwrap();
		assert_eq!(assets.len(), 1);
		assert_eq!(assets[0].id, id);
		assert_eq!(assets[0].url, "https://cdn.test/a.png");
		assert_eq!(assets[0].name.as_deref(), Some("a.png"));
	}

	#[tokio::test]
	async fn test_list_orders_newest_first() {
		let pool = create_widget_test_pool().await;
		let repo = AssetRepository::new(pool.clone());

		for (id, uploaded_at) in [
			("older", "2025-01-01T00:00:00+00:00"),
			("newer", "2025-06-01T00:00:00+00:00"),
		] {
			sqlx::query(
				"INSERT INTO assets (id, account_id, url, name, uploaded_at) VALUES (?, ?, ?, ?, ?)",
			)
			.bind(id)
			.bind("abc123")
			.bind("https://cdn.test/x.png")
			.bind(Option::<&str>::None)
			.bind(uploaded_at)
			.execute(&pool)
			.await
			.unwrap();
		}

		let assets = repo.list_assets_for_account("abc123").await.unwrap();
		let ids: Vec<&str> = assets.iter().map(|a| a.id.as_str()).collect();
		assert_eq!(ids, vec!["newer", "older"]);
	}

	#[tokio::test]
	async fn test_assets_are_scoped_by_account() {
		let pool = create_widget_test_pool().await;
		let repo = AssetRepository::new(pool);

		repo.insert_asset("abc123", "https://cdn.test/a.png", None)
			.await
			.unwrap();
		repo.insert_asset("xyz456", "https://cdn.test/b.png", None)
			.await
			.unwrap();

		let assets = repo.list_assets_for_account("abc123").await.unwrap();
		assert_eq!(assets.len(), 1);
		assert_eq!(assets[0].account_id, "abc123");
	}
}
