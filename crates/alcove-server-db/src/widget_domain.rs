// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Widget origin allow-list repository.
//!
//! Each row is one (account_id, origin) pair. An account with no rows allows
//! nothing: resolution over this table must fail closed, never open.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;

#[async_trait]
pub trait WidgetDomainStore: Send + Sync {
	async fn list_domains_for_account(&self, account_id: &str) -> Result<Vec<String>, DbError>;
	async fn add_domain(&self, account_id: &str, domain: &str) -> Result<String, DbError>;
	async fn remove_domain(&self, account_id: &str, domain: &str) -> Result<bool, DbError>;
}

/// Repository for widget allow-list database operations.
///
/// Origins are stored in normalized `scheme://host[:port]` form; callers
/// normalize before writing so that reads can compare for exact equality.
#[derive(Clone)]
pub struct WidgetDomainRepository {
	pool: SqlitePool,
}

impl WidgetDomainRepository {
	/// Create a new widget domain repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// List the origins registered for an account.
	///
	/// # Returns
	/// The empty vector when the account has no registered origins.
	#[tracing::instrument(skip(self))]
	pub async fn list_domains_for_account(&self, account_id: &str) -> Result<Vec<String>, DbError> {
		let domains = sqlx::query_scalar::<_, String>(
			r#"
			SELECT domain
			FROM widget_domains
			WHERE account_id = ?
			ORDER BY created_at ASC, rowid ASC
			"#,
		)
		.bind(account_id)
		.fetch_all(&self.pool)
		.await?;

		Ok(domains)
	}

	/// Register an origin for an account.
	///
	/// # Returns
	/// The generated row ID.
	///
	/// # Errors
	/// `DbError::Conflict` when the (account_id, domain) pair already exists.
	#[tracing::instrument(skip(self))]
	pub async fn add_domain(&self, account_id: &str, domain: &str) -> Result<String, DbError> {
		let id = Uuid::new_v4().to_string();
		let now = Utc::now();

		let result = sqlx::query(
			r#"
			INSERT INTO widget_domains (id, account_id, domain, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(&id)
		.bind(account_id)
		.bind(domain)
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => {
				tracing::debug!(account_id, domain, "widget domain registered");
				Ok(id)
			}
			Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DbError::Conflict(
				format!("domain {domain} already registered for this account"),
			)),
			Err(e) => Err(e.into()),
		}
	}

	/// Remove a registered origin.
	///
	/// # Returns
	/// `true` when a row was deleted, `false` when no such pair existed.
	#[tracing::instrument(skip(self))]
	pub async fn remove_domain(&self, account_id: &str, domain: &str) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			DELETE FROM widget_domains
			WHERE account_id = ? AND domain = ?
			"#,
		)
		.bind(account_id)
		.bind(domain)
		.execute(&self.pool)
		.await?;

		let removed = result.rows_affected() > 0;
		if removed {
			tracing::debug!(account_id, domain, "widget domain removed");
		}
		Ok(removed)
	}
}

#[async_trait]
impl WidgetDomainStore for WidgetDomainRepository {
	async fn list_domains_for_account(&self, account_id: &str) -> Result<Vec<String>, DbError> {
		self.list_domains_for_account(account_id).await
	}

	async fn add_domain(&self, account_id: &str, domain: &str) -> Result<String, DbError> {
		self.add_domain(account_id, domain).await
	}

	async fn remove_domain(&self, account_id: &str, domain: &str) -> Result<bool, DbError> {
		self.remove_domain(account_id, domain).await
	}
}
