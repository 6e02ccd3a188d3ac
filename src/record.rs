//! The record interface serialized objects must expose
//!
//! The serializer never inspects host types directly; it reads scalar
//! values and related records through the [`Record`] trait. Any domain
//! model can implement it, and [`ObjectRecord`] is provided as a
//! ready-made implementation backed by `serde_json` values.

use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a serializable record
///
/// Records are reference-counted so the same instance can be reached
/// through multiple relationship edges without cloning the data.
pub type RecordHandle = Rc<dyn Record>;

/// Accessor surface the serializer reads records through
///
/// Both lookups return `None` when the accessor does not exist on the
/// record, which the serializer surfaces as an error; an existing but
/// empty relationship is `Some(vec![])`.
pub trait Record {
	/// Fetch a scalar value by accessor name
	fn value(&self, accessor: &str) -> Option<Value>;

	/// Fetch related records by accessor name
	fn related(&self, accessor: &str) -> Option<Vec<RecordHandle>>;

	/// The record's own resource-type name, for polymorphic
	/// relationships. When a record reports a type it takes precedence
	/// over the statically declared target type.
	fn resource_type(&self) -> Option<&str> {
		None
	}
}

/// A [`Record`] backed by a map of `serde_json` values and explicit
/// related-record lists
///
/// # Examples
///
/// ```
/// use jsonapi_serializer::{ObjectRecord, Record};
/// use serde_json::json;
///
/// let movie = ObjectRecord::new()
///     .with_value("id", json!(1))
///     .with_value("name", json!("Foo"));
///
/// assert_eq!(movie.value("name"), Some(json!("Foo")));
/// assert_eq!(movie.value("missing"), None);
/// ```
#[derive(Default)]
pub struct ObjectRecord {
	values: serde_json::Map<String, Value>,
	related: HashMap<String, Vec<RecordHandle>>,
	resource_type: Option<String>,
}

impl ObjectRecord {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a scalar accessor
	pub fn with_value(mut self, accessor: impl Into<String>, value: Value) -> Self {
		self.values.insert(accessor.into(), value);
		self
	}

	/// Set a related-records accessor
	pub fn with_related(mut self, accessor: impl Into<String>, records: Vec<RecordHandle>) -> Self {
		self.related.insert(accessor.into(), records);
		self
	}

	/// Declare the record's own resource type for polymorphic dispatch
	pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
		self.resource_type = Some(resource_type.into());
		self
	}

	/// Wrap the record in a shared handle
	pub fn into_handle(self) -> RecordHandle {
		Rc::new(self)
	}
}

impl Record for ObjectRecord {
	fn value(&self, accessor: &str) -> Option<Value> {
		self.values.get(accessor).cloned()
	}

	fn related(&self, accessor: &str) -> Option<Vec<RecordHandle>> {
		self.related.get(accessor).cloned()
	}

	fn resource_type(&self) -> Option<&str> {
		self.resource_type.as_deref()
	}
}
