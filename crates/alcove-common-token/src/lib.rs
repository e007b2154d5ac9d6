// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Signed widget token utilities.
//!
//! A widget token is a stateless bearer credential proving which account an
//! embedded widget belongs to. Wire format, two segments joined by a literal
//! `.`:
//!
//! ```text
//! base64url_nopad(account_id) "." hex(hmac_sha256(secret, payload))
//! ```
//!
//! Issuance and verification are pure: no I/O, no clock, no shared state. The
//! signing secret is injected at construction so tests and multi-tenant
//! deployments can hold distinct codecs side by side.

use alcove_common_secret::SecretString;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
	#[error("account id must not be empty")]
	EmptyAccountId,
}

/// Issues and verifies widget bearer tokens for one signing secret.
#[derive(Clone)]
pub struct WidgetTokenCodec {
	secret: SecretString,
}

impl WidgetTokenCodec {
	pub fn new(secret: SecretString) -> Self {
		Self { secret }
	}

	/// Issue a token for `account_id`.
	///
	/// Deterministic: the same account id and secret always produce the same
	/// token.
	pub fn issue(&self, account_id: &str) -> Result<String, TokenError> {
		if account_id.is_empty() {
			return Err(TokenError::EmptyAccountId);
		}

		let payload = URL_SAFE_NO_PAD.encode(account_id.as_bytes());
		let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
			.expect("HMAC can take key of any size");
		mac.update(payload.as_bytes());
		let signature = hex::encode(mac.finalize().into_bytes());

		Ok(format!("{payload}.{signature}"))
	}

	/// Verify an untrusted token and return the account id it was issued for.
	///
	/// Returns `None` for any malformed, tampered, or foreign-secret token.
	/// The signature comparison is constant-time (`Mac::verify_slice`); the
	/// caller cannot distinguish which check failed, and nothing about the
	/// token is logged here.
	pub fn verify(&self, token: &str) -> Option<String> {
		let token = token.trim();

		let mut segments = token.split('.');
		let (payload, signature) = match (segments.next(), segments.next(), segments.next()) {
			(Some(payload), Some(signature), None)
				if !payload.is_empty() && !signature.is_empty() =>
			{
				(payload, signature)
			}
			_ => return None,
		};

		let signature_bytes = hex::decode(signature).ok()?;

		let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes()).ok()?;
		mac.update(payload.as_bytes());
		mac.verify_slice(&signature_bytes).ok()?;

		// Signature checked out; the payload should decode unless the token
		// was produced by a future codec revision.
		let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
		String::from_utf8(decoded).ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn codec(secret: &str) -> WidgetTokenCodec {
		WidgetTokenCodec::new(SecretString::from(secret))
	}

	fn flip_char(s: &str, index: usize) -> String {
		let mut chars: Vec<char> = s.chars().collect();
		chars[index] = if chars[index] == 'a' { 'b' } else { 'a' };
		chars.into_iter().collect()
	}

	#[test]
	fn test_issue_then_verify() {
		let codec = codec("topsecret");
		let token = codec.issue("abc123").unwrap();
		assert_eq!(codec.verify(&token).as_deref(), Some("abc123"));
	}

	#[test]
	fn test_issue_is_deterministic() {
		let codec = codec("topsecret");
		assert_eq!(codec.issue("abc123").unwrap(), codec.issue("abc123").unwrap());
	}

	#[test]
	fn test_token_wire_shape() {
		let codec = codec("topsecret");
		let token = codec.issue("abc123").unwrap();
		let (payload, signature) = token.split_once('.').unwrap();
		assert_eq!(payload, "YWJjMTIz");
		assert_eq!(signature.len(), 64);
		assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn test_issue_rejects_empty_account_id() {
		assert_eq!(codec("topsecret").issue(""), Err(TokenError::EmptyAccountId));
	}

	#[test]
	fn test_verify_trims_incidental_whitespace() {
		let codec = codec("topsecret");
		let token = codec.issue("abc123").unwrap();
		assert_eq!(codec.verify(&format!("  {token}\n")).as_deref(), Some("abc123"));
	}

	#[test]
	fn test_verify_rejects_flipped_payload_char() {
		let codec = codec("topsecret");
		let token = codec.issue("abc123").unwrap();
		assert_eq!(codec.verify(&flip_char(&token, 0)), None);
	}

	#[test]
	fn test_verify_rejects_flipped_signature_char() {
		let codec = codec("topsecret");
		let token = codec.issue("abc123").unwrap();
		let last = token.len() - 1;
		assert_eq!(codec.verify(&flip_char(&token, last)), None);
	}

	#[test]
	fn test_verify_rejects_other_secret() {
		let token = codec("topsecret").issue("abc123").unwrap();
		assert_eq!(codec("othersecret").verify(&token), None);
	}

	#[test]
	fn test_verify_rejects_malformed_input() {
		let codec = codec("topsecret");
		for bad in [
			"",
			"   ",
			"noseparator",
			"a.b.c",
			".signatureonly",
			"payloadonly.",
			".",
			"..",
		] {
			assert_eq!(codec.verify(bad), None, "accepted {bad:?}");
		}
	}

	#[test]
	fn test_verify_rejects_non_hex_signature() {
		let codec = codec("topsecret");
		assert_eq!(codec.verify("YWJjMTIz.not-valid-hex"), None);
	}

	#[test]
	fn test_verify_rejects_undecodable_payload() {
		// A correctly signed payload that is not valid base64url must still
		// be rejected, without revealing that the signature matched.
		let secret = "topsecret";
		let payload = "!not-base64url!";
		let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
		mac.update(payload.as_bytes());
		let signature = hex::encode(mac.finalize().into_bytes());
		assert_eq!(codec(secret).verify(&format!("{payload}.{signature}")), None);
	}

	#[test]
	fn test_roundtrip_preserves_unicode_account_id() {
		let codec = codec("topsecret");
		let token = codec.issue("büro-42/ßigkeit").unwrap();
		assert_eq!(codec.verify(&token).as_deref(), Some("büro-42/ßigkeit"));
	}
}
