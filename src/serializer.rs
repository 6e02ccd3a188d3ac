//! The serialize entry point

use crate::descriptor::ResourceDescriptor;
use crate::document::assemble;
use crate::error::SerializeResult;
use crate::graph::{SerializationContext, build_many, build_one};
use crate::include::IncludeTree;
use crate::key_transform::KeyTransform;
use crate::record::RecordHandle;
use crate::registry::SerializerRegistry;
use serde_json::Value;
use std::sync::Arc;

/// Input to a serialize call: one record or an ordered collection
pub enum Records {
	One(RecordHandle),
	Many(Vec<RecordHandle>),
}

impl From<RecordHandle> for Records {
	fn from(record: RecordHandle) -> Self {
		Self::One(record)
	}
}

impl From<Vec<RecordHandle>> for Records {
	fn from(records: Vec<RecordHandle>) -> Self {
		Self::Many(records)
	}
}

/// Per-call options
#[derive(Clone, Default)]
pub struct SerializeOptions {
	/// Dot-delimited include paths, e.g. `"comments.author"`
	pub include: Vec<String>,
	/// Overrides the descriptor's key-transform policy for this call
	pub key_transform: Option<KeyTransform>,
	/// Additional top-level meta
	pub meta: Option<Value>,
	/// Additional top-level links
	pub links: Option<Value>,
}

/// Serializes records through compiled descriptors into JSON:API
/// documents
///
/// Each call owns its own context, so a serializer shared between threads
/// can serve concurrent calls as long as the registry is not mutated
/// underneath them.
///
/// # Examples
///
/// ```
/// use jsonapi_serializer::{
///     JsonApiSerializer, ObjectRecord, ResourceDescriptor, SerializeOptions,
///     SerializerRegistry,
/// };
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut registry = SerializerRegistry::new();
/// let movie = registry.register(
///     ResourceDescriptor::builder("movie").attribute("name").build(),
/// );
/// let serializer = JsonApiSerializer::new(Arc::new(registry));
///
/// let record = ObjectRecord::new()
///     .with_value("id", json!(1))
///     .with_value("name", json!("Foo"))
///     .into_handle();
/// let document = serializer
///     .serialize(&movie, record, &SerializeOptions::default())
///     .unwrap();
/// assert_eq!(document["data"]["attributes"]["name"], json!("Foo"));
/// ```
pub struct JsonApiSerializer {
	registry: Arc<SerializerRegistry>,
}

impl JsonApiSerializer {
	pub fn new(registry: Arc<SerializerRegistry>) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &Arc<SerializerRegistry> {
		&self.registry
	}

	/// Serialize `records` through `descriptor` into a complete JSON:API
	/// document
	///
	/// Fatal on the first resolution error; no partial document is
	/// returned.
	pub fn serialize(
		&self,
		descriptor: &Arc<ResourceDescriptor>,
		records: impl Into<Records>,
		options: &SerializeOptions,
	) -> SerializeResult<Value> {
		let records = records.into();
		let include = IncludeTree::parse(&options.include);
		let mut ctx = SerializationContext::new(&self.registry, options.key_transform);

		let span = tracing::debug_span!(
			"serializable_hash",
			resource_type = %descriptor.resource_type(),
		);
		let data = {
			let _enter = span.enter();
			match &records {
				Records::One(record) => build_one(descriptor, record, &include, &mut ctx)?,
				Records::Many(records) => build_many(descriptor, records, &include, &mut ctx)?,
			}
		};
		tracing::debug!(
			resource_type = %descriptor.resource_type(),
			included = ctx.included_count(),
			"serialized document"
		);

		Ok(assemble(
			data,
			ctx.into_included(),
			options.meta.clone(),
			options.links.clone(),
		))
	}
}
