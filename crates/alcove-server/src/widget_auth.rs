// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Widget request authorization.
//!
//! Every widget script request runs the same stateless decision procedure:
//! verify the bearer token, establish the requesting origin, then check the
//! origin against the account's persisted allow-list. Each step that cannot
//! be completed rejects the request; the allow-list check fails closed on
//! lookup errors and timeouts.

use std::sync::Arc;
use std::time::Duration;

use alcove_common_token::WidgetTokenCodec;
use alcove_server_db::WidgetDomainStore;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::time::timeout;
use url::{Origin, Url};

/// Terminal rejection states of the widget decision procedure.
///
/// Distinct status codes let the embed script and tests branch on the failure
/// cause; the bodies stay fixed so nothing about the token is leaked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAuthError {
	MissingToken,
	InvalidToken,
	MissingOrigin,
	NotAllowed,
}

impl WidgetAuthError {
	pub fn status(&self) -> StatusCode {
		match self {
			WidgetAuthError::MissingToken | WidgetAuthError::MissingOrigin => {
				StatusCode::BAD_REQUEST
			}
			WidgetAuthError::InvalidToken => StatusCode::UNAUTHORIZED,
			WidgetAuthError::NotAllowed => StatusCode::FORBIDDEN,
		}
	}

	pub fn message(&self) -> &'static str {
		match self {
			WidgetAuthError::MissingToken => "missing token",
			WidgetAuthError::InvalidToken => "invalid or expired token",
			WidgetAuthError::MissingOrigin => "missing or unparseable origin",
			WidgetAuthError::NotAllowed => "domain not allowed for this account",
		}
	}
}

impl IntoResponse for WidgetAuthError {
	fn into_response(self) -> Response {
		(self.status(), self.message()).into_response()
	}
}

/// Reduce an `Origin` or `Referer` header value to a normalized
/// `scheme://host[:port]` origin string.
///
/// Default ports are elided so that `https://example.com:443` and
/// `https://example.com` compare equal. Opaque origins (`file:`, `data:`,
/// the literal `null` sent by sandboxed frames) do not resolve to a
/// comparable origin and yield `None`.
pub fn normalize_origin(value: &str) -> Option<String> {
	let url = Url::parse(value.trim()).ok()?;
	match url.origin() {
		origin @ Origin::Tuple(..) => Some(origin.ascii_serialization()),
		Origin::Opaque(_) => None,
	}
}

/// Establish the requesting origin from request headers.
///
/// Prefers the `Origin` header; falls back to deriving the origin from
/// `Referer`. `None` when neither is present and parseable.
pub fn request_origin(headers: &HeaderMap) -> Option<String> {
	if let Some(origin) = headers
		.get(header::ORIGIN)
		.and_then(|v| v.to_str().ok())
		.and_then(normalize_origin)
	{
		return Some(origin);
	}

	headers
		.get(header::REFERER)
		.and_then(|v| v.to_str().ok())
		.and_then(normalize_origin)
}

/// Decides whether an origin may load the widget for an account.
///
/// One bounded read against the allow-list store per call, with a single
/// retry on transient store errors (none on timeout). Every failure path
/// denies; this resolver never propagates an error to the handler.
pub struct DomainAllowList {
	store: Arc<dyn WidgetDomainStore>,
	lookup_timeout: Duration,
}

impl DomainAllowList {
	pub fn new(store: Arc<dyn WidgetDomainStore>, lookup_timeout: Duration) -> Self {
		Self {
			store,
			lookup_timeout,
		}
	}

	/// True iff `origin` is an exact member of the account's registered set.
	///
	/// Comparison is exact string equality over normalized origins; prefix
	/// matching would let `https://example.com.attacker.net` impersonate
	/// `https://example.com`.
	pub async fn is_allowed(&self, account_id: &str, origin: &str) -> bool {
		match self.lookup(account_id).await {
			Ok(domains) => domains.iter().any(|d| d == origin),
			Err(retryable) => {
				if !retryable {
					return false;
				}
				tracing::warn!(account_id, "allow-list lookup failed, retrying once");
				match self.lookup(account_id).await {
					Ok(domains) => domains.iter().any(|d| d == origin),
					Err(_) => {
						tracing::error!(account_id, "allow-list lookup failed after retry, denying");
						false
					}
				}
			}
		}
	}

	/// One bounded lookup. `Err(true)` is a retryable store error,
	/// `Err(false)` a timeout.
	async fn lookup(&self, account_id: &str) -> Result<Vec<String>, bool> {
		match timeout(
			self.lookup_timeout,
			self.store.list_domains_for_account(account_id),
		)
		.await
		{
			Ok(Ok(domains)) => Ok(domains),
			Ok(Err(e)) => {
				tracing::warn!(error = %e, account_id, "allow-list store error");
				Err(true)
			}
			Err(_) => {
				tracing::warn!(
					account_id,
					timeout_ms = self.lookup_timeout.as_millis() as u64,
					"allow-list lookup timed out, denying"
				);
				Err(false)
			}
		}
	}
}

/// Run the full widget decision procedure for one request.
///
/// Returns the verified account id, or the first terminal rejection.
pub async fn authorize_widget_request(
	codec: &WidgetTokenCodec,
	allow_list: &DomainAllowList,
	token: Option<&str>,
	headers: &HeaderMap,
) -> Result<String, WidgetAuthError> {
	let token = token
		.map(str::trim)
		.filter(|t| !t.is_empty())
		.ok_or(WidgetAuthError::MissingToken)?;

	let account_id = codec.verify(token).ok_or(WidgetAuthError::InvalidToken)?;

	let origin = request_origin(headers).ok_or(WidgetAuthError::MissingOrigin)?;

	if !allow_list.is_allowed(&account_id, &origin).await {
		return Err(WidgetAuthError::NotAllowed);
	}

	Ok(account_id)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alcove_common_secret::SecretString;
	use alcove_server_db::DbError;
	use async_trait::async_trait;
	use axum::http::HeaderValue;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[test]
	fn test_normalize_origin_exact() {
		assert_eq!(
			normalize_origin("https://example.com").as_deref(),
			Some("https://example.com")
		);
	}

	#[test]
	fn test_normalize_origin_elides_default_port() {
		assert_eq!(
			normalize_origin("https://example.com:443").as_deref(),
			Some("https://example.com")
		);
		assert_eq!(
			normalize_origin("http://example.com:80").as_deref(),
			Some("http://example.com")
		);
	}

	#[test]
	fn test_normalize_origin_keeps_explicit_port() {
		assert_eq!(
			normalize_origin("http://localhost:3000").as_deref(),
			Some("http://localhost:3000")
		);
	}

	#[test]
	fn test_normalize_origin_reduces_full_url() {
		assert_eq!(
			normalize_origin("https://example.com/pricing?plan=pro#faq").as_deref(),
			Some("https://example.com")
		);
	}

	#[test]
	fn test_normalize_origin_rejects_garbage() {
		assert_eq!(normalize_origin("not a url"), None);
		assert_eq!(normalize_origin(""), None);
		assert_eq!(normalize_origin("null"), None);
	}

	#[test]
	fn test_normalize_origin_rejects_opaque_origins() {
		assert_eq!(normalize_origin("data:text/html,hi"), None);
	}

	#[test]
	fn test_request_origin_prefers_origin_header() {
		let mut headers = HeaderMap::new();
		headers.insert(header::ORIGIN, HeaderValue::from_static("https://a.com"));
		headers.insert(
			header::REFERER,
			HeaderValue::from_static("https://b.com/page"),
		);
		assert_eq!(request_origin(&headers).as_deref(), Some("https://a.com"));
	}

	#[test]
	fn test_request_origin_falls_back_to_referer() {
		let mut headers = HeaderMap::new();
		headers.insert(
			header::REFERER,
			HeaderValue::from_static("https://b.com/page?x=1"),
		);
		assert_eq!(request_origin(&headers).as_deref(), Some("https://b.com"));
	}

	#[test]
	fn test_request_origin_none_when_absent() {
		assert_eq!(request_origin(&HeaderMap::new()), None);
	}

	struct StaticStore {
		domains: Vec<String>,
	}

	#[async_trait]
	impl WidgetDomainStore for StaticStore {
		async fn list_domains_for_account(&self, _account_id: &str) -> Result<Vec<String>, DbError> {
			Ok(self.domains.clone())
		}

		async fn add_domain(&self, _account_id: &str, _domain: &str) -> Result<String, DbError> {
			Err(DbError::Internal("read-only test store".to_string()))
		}

		async fn remove_domain(&self, _account_id: &str, _domain: &str) -> Result<bool, DbError> {
			Err(DbError::Internal("read-only test store".to_string()))
		}
	}

	struct FlakyStore {
		calls: AtomicUsize,
		fail_first: usize,
	}

	#[async_trait]
	impl WidgetDomainStore for FlakyStore {
		async fn list_domains_for_account(&self, _account_id: &str) -> Result<Vec<String>, DbError> {
			if self.calls.fetch_add(1, Ordering::SeqCst) < self.fail_first {
				return Err(DbError::Internal("store unreachable".to_string()));
			}
			Ok(vec!["https://example.com".to_string()])
		}

		async fn add_domain(&self, _account_id: &str, _domain: &str) -> Result<String, DbError> {
			Err(DbError::Internal("read-only test store".to_string()))
		}

		async fn remove_domain(&self, _account_id: &str, _domain: &str) -> Result<bool, DbError> {
			Err(DbError::Internal("read-only test store".to_string()))
		}
	}

	struct SlowStore;

	#[async_trait]
	impl WidgetDomainStore for SlowStore {
		async fn list_domains_for_account(&self, _account_id: &str) -> Result<Vec<String>, DbError> {
			tokio::time::sleep(Duration::from_secs(5)).await;
			Ok(vec!["https://example.com".to_string()])
		}

		async fn add_domain(&self, _account_id: &str, _domain: &str) -> Result<String, DbError> {
			Err(DbError::Internal("read-only test store".to_string()))
		}

		async fn remove_domain(&self, _account_id: &str, _domain: &str) -> Result<bool, DbError> {
			Err(DbError::Internal("read-only test store".to_string()))
		}
	}

	fn allow_list(store: impl WidgetDomainStore + 'static) -> DomainAllowList {
		DomainAllowList::new(Arc::new(store), Duration::from_millis(100))
	}

	#[tokio::test]
	async fn test_is_allowed_exact_match_only() {
		let list = allow_list(StaticStore {
			domains: vec!["https://example.com".to_string()],
		});

		assert!(list.is_allowed("abc123", "https://example.com").await);
		assert!(!list.is_allowed("abc123", "https://example.com.evil.com").await);
		assert!(!list.is_allowed("abc123", "http://example.com").await);
		assert!(!list.is_allowed("abc123", "https://sub.example.com").await);
	}

	#[tokio::test]
	async fn test_is_allowed_denies_when_no_domains_registered() {
		let list = allow_list(StaticStore { domains: vec![] });
		assert!(!list.is_allowed("abc123", "https://example.com").await);
	}

	#[tokio::test]
	async fn test_is_allowed_fails_closed_on_store_error() {
		let list = allow_list(FlakyStore {
			calls: AtomicUsize::new(0),
			fail_first: usize::MAX,
		});
		assert!(!list.is_allowed("abc123", "https://example.com").await);
	}

	#[tokio::test]
	async fn test_is_allowed_retries_once_on_store_error() {
		let store = FlakyStore {
			calls: AtomicUsize::new(0),
			fail_first: 1,
		};
		let list = allow_list(store);
		assert!(list.is_allowed("abc123", "https://example.com").await);
	}

	#[tokio::test]
	async fn test_is_allowed_fails_closed_on_timeout() {
		let list = allow_list(SlowStore);
		assert!(!list.is_allowed("abc123", "https://example.com").await);
	}

	#[tokio::test]
	async fn test_authorize_rejects_in_order() {
		let codec = WidgetTokenCodec::new(SecretString::from("topsecret"));
		let list = allow_list(StaticStore {
			domains: vec!["https://example.com".to_string()],
		});

		let mut headers = HeaderMap::new();
		headers.insert(header::ORIGIN, HeaderValue::from_static("https://example.com"));

		// Missing token wins over everything else.
		assert_eq!(
			authorize_widget_request(&codec, &list, None, &headers).await,
			Err(WidgetAuthError::MissingToken)
		);
		assert_eq!(
			authorize_widget_request(&codec, &list, Some("   "), &headers).await,
			Err(WidgetAuthError::MissingToken)
		);

		// Bad token is rejected before the origin is even considered.
		assert_eq!(
			authorize_widget_request(&codec, &list, Some("garbage"), &HeaderMap::new()).await,
			Err(WidgetAuthError::InvalidToken)
		);

		let token = codec.issue("abc123").unwrap();
		assert_eq!(
			authorize_widget_request(&codec, &list, Some(&token), &HeaderMap::new()).await,
			Err(WidgetAuthError::MissingOrigin)
		);

		assert_eq!(
			authorize_widget_request(&codec, &list, Some(&token), &headers).await,
			Ok("abc123".to_string())
		);
	}
}
