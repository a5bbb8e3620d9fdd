//! Request canonicalization and signing for processors that authenticate
//! callers with a shared password instead of a bearer token.
//!
//! The signature is the lowercase hex SHA-1 of
//! `secret|value_1|value_2|...|value_n`, where the values follow the
//! lexicographic order of their keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

pub const SIGNATURE_FIELD: &str = "signature";
const SEPARATOR: &str = "|";

/// A scalar request value. Numbers are joined in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
	Number(i64),
	Text(String),
}

impl FieldValue {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			FieldValue::Text(text) => Some(text),
			FieldValue::Number(_) => None,
		}
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Number(number) => write!(f, "{number}"),
			FieldValue::Text(text) => f.write_str(text),
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		FieldValue::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		FieldValue::Text(value)
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		FieldValue::Number(value)
	}
}

/// Flat request body. Keys are kept in byte order, which is the order the
/// signature is computed in.
pub type RequestFields = BTreeMap<String, FieldValue>;

/// A request carrying its `signature` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SignedRequest(RequestFields);

impl SignedRequest {
	pub fn signature(&self) -> &str {
		self.0
			.get(SIGNATURE_FIELD)
			.and_then(FieldValue::as_text)
			.unwrap_or_default()
	}

	pub fn fields(&self) -> &RequestFields {
		&self.0
	}

	pub fn into_fields(self) -> RequestFields {
		self.0
	}
}

/// The text the digest is computed over. A `signature` already present in
/// `fields` is left out, so re-signing a signed request is a no-op.
pub fn canonical_blob(fields: &RequestFields, secret: &str) -> String {
	let mut parts = Vec::with_capacity(fields.len() + 1);
	parts.push(secret.to_string());
	parts.extend(
		fields
			.iter()
			.filter(|(key, _)| key.as_str() != SIGNATURE_FIELD)
			.map(|(_, value)| value.to_string()),
	);
	parts.join(SEPARATOR)
}

pub fn signature_of(fields: &RequestFields, secret: &str) -> String {
	hex::encode(Sha1::digest(canonical_blob(fields, secret).as_bytes()))
}

/// Returns a copy of `fields` with `signature` set.
pub fn sign(fields: &RequestFields, secret: &str) -> SignedRequest {
	let mut signed = fields.clone();
	signed.insert(
		SIGNATURE_FIELD.to_string(),
		FieldValue::Text(signature_of(fields, secret)),
	);
	SignedRequest(signed)
}
