//! Final document assembly
//!
//! All keys inside `data` and `included` have already been transformed
//! during graph construction; assembly only decides which top-level
//! sections appear.

use serde_json::{Map, Value};

/// Wrap primary data, the included set, and optional top-level sections
/// into the final JSON:API document shape
///
/// `included` is emitted only when at least one resource was expanded;
/// `meta` and `links` only when configured on the call.
pub fn assemble(
	data: Value,
	included: Vec<Value>,
	meta: Option<Value>,
	links: Option<Value>,
) -> Value {
	let mut document = Map::new();
	document.insert("data".to_string(), data);
	if !included.is_empty() {
		document.insert("included".to_string(), Value::Array(included));
	}
	if let Some(meta) = meta {
		document.insert("meta".to_string(), meta);
	}
	if let Some(links) = links {
		document.insert("links".to_string(), links);
	}
	Value::Object(document)
}
