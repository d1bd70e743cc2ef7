//! Content fingerprints (strong ETags) for conditional reads.
//!
//! The fingerprint is the SHA-256 of the value's JSON form with object keys
//! sorted, so it does not depend on struct field order or serializer settings.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::errors::ServiceError;

/// Quoted hex digest suitable for an `ETag` header.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, ServiceError> {
    let value = serde_json::to_value(value).map_err(|e| ServiceError::Internal(e.to_string()))?;
    let mut canonical = String::new();
    write_canonical(&value, &mut canonical);
    Ok(format!("\"{:x}\"", Sha256::digest(canonical.as_bytes())))
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(k.clone()).to_string());
                out.push(':');
                write_canonical(v, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, v) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(v, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Accepts a comma separated list, weak (`W/`) tags and `*`.
pub fn if_none_match(header: &str, etag: &str) -> bool {
    header
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .any(|t| t == "*" || t.strip_prefix("W/").unwrap_or(t) == etag)
}
