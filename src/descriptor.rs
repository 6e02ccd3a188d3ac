//! Resource descriptors and their builder
//!
//! A [`ResourceDescriptor`] is the compiled, immutable model of how one
//! resource type maps to JSON:API output: id source, ordered attribute and
//! relationship specs, links, meta, and the key-transform policy. The
//! class-level declaration style of serializer frameworks becomes an
//! explicit [`DescriptorBuilder`] step here, with inheritance modeled as
//! copy-then-override composition rather than subclassing.

use crate::error::{SerializeError, SerializeResult};
use crate::key_transform::KeyTransform;
use crate::record::{Record, RecordHandle};
use crate::relationship::Relationship;
use serde_json::Value;
use std::sync::Arc;

/// Computation over a single record
pub type RecordFn = Arc<dyn Fn(&dyn Record) -> Value + Send + Sync>;

/// Computation over a record plus the complete input collection
///
/// The collection is a one-element slice when a single record is being
/// serialized, so an id override behaves uniformly for one record or many.
pub type CollectionFn = Arc<dyn Fn(&dyn Record, &[RecordHandle]) -> Value + Send + Sync>;

/// How the resource id is obtained
#[derive(Clone)]
pub(crate) enum IdSource {
	Accessor(String),
	Computation(CollectionFn),
}

/// How an attribute or link value is obtained
#[derive(Clone)]
pub(crate) enum ValueSource {
	Accessor(String),
	Computation(RecordFn),
}

#[derive(Clone)]
pub(crate) struct AttributeSpec {
	pub(crate) name: String,
	pub(crate) source: ValueSource,
}

#[derive(Clone)]
pub(crate) struct LinkSpec {
	pub(crate) name: String,
	pub(crate) source: ValueSource,
}

/// Compiled, immutable mapping from a resource type to its JSON:API
/// output shape
///
/// Built once via [`DescriptorBuilder`] and shared behind an `Arc`
/// afterwards; redefinition means building a new descriptor and
/// re-registering it.
pub struct ResourceDescriptor {
	resource_type: String,
	id: IdSource,
	attributes: Vec<AttributeSpec>,
	relationships: Vec<Relationship>,
	links: Vec<LinkSpec>,
	meta: Option<RecordFn>,
	key_transform: KeyTransform,
}

impl ResourceDescriptor {
	/// Start building a descriptor for `resource_type`
	pub fn builder(resource_type: impl Into<String>) -> DescriptorBuilder {
		DescriptorBuilder::new(resource_type)
	}

	pub fn resource_type(&self) -> &str {
		&self.resource_type
	}

	pub fn key_transform(&self) -> KeyTransform {
		self.key_transform
	}

	pub(crate) fn attributes(&self) -> &[AttributeSpec] {
		&self.attributes
	}

	pub(crate) fn relationships(&self) -> &[Relationship] {
		&self.relationships
	}

	pub(crate) fn links(&self) -> &[LinkSpec] {
		&self.links
	}

	pub(crate) fn meta(&self) -> Option<&RecordFn> {
		self.meta.as_ref()
	}

	/// Resolve the resource id for `record`, stringified per JSON:API
	pub(crate) fn resolve_id(
		&self,
		record: &dyn Record,
		collection: &[RecordHandle],
	) -> SerializeResult<String> {
		let value = match &self.id {
			IdSource::Accessor(accessor) => record
				.value(accessor)
				.ok_or_else(|| SerializeError::missing_accessor(&self.resource_type, accessor))?,
			IdSource::Computation(computation) => computation(record, collection),
		};
		Ok(stringify_id(&value))
	}

	/// Resolve one attribute or link value against `record`
	pub(crate) fn resolve_value(
		&self,
		record: &dyn Record,
		source: &ValueSource,
	) -> SerializeResult<Value> {
		match source {
			ValueSource::Accessor(accessor) => record
				.value(accessor)
				.ok_or_else(|| SerializeError::missing_accessor(&self.resource_type, accessor)),
			ValueSource::Computation(computation) => Ok(computation(record)),
		}
	}
}

/// JSON:API ids are strings; scalars are rendered without quoting.
pub(crate) fn stringify_id(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Builder compiling declarative resource descriptions into a
/// [`ResourceDescriptor`]
///
/// Declarations are idempotent by output name: redeclaring a name
/// replaces the earlier spec in place instead of appending a duplicate.
///
/// # Examples
///
/// ```
/// use jsonapi_serializer::{KeyTransform, Relationship, ResourceDescriptor};
///
/// let movie = ResourceDescriptor::builder("movie")
///     .attributes(["name", "release_year"])
///     .relationship(Relationship::has_many("actors"))
///     .key_transform(KeyTransform::Underscore)
///     .build();
/// assert_eq!(movie.resource_type(), "movie");
/// ```
pub struct DescriptorBuilder {
	resource_type: String,
	id: IdSource,
	attributes: Vec<AttributeSpec>,
	relationships: Vec<Relationship>,
	links: Vec<LinkSpec>,
	meta: Option<RecordFn>,
	key_transform: KeyTransform,
}

impl DescriptorBuilder {
	pub fn new(resource_type: impl Into<String>) -> Self {
		Self {
			resource_type: resource_type.into(),
			id: IdSource::Accessor("id".to_string()),
			attributes: Vec::new(),
			relationships: Vec::new(),
			links: Vec::new(),
			meta: None,
			key_transform: KeyTransform::default(),
		}
	}

	/// Copy-then-override inheritance: start from the parent's compiled
	/// specs, then let subsequent declarations append or replace by name
	pub fn extending(mut self, parent: &ResourceDescriptor) -> Self {
		self.id = parent.id.clone();
		self.attributes = parent.attributes.clone();
		self.relationships = parent.relationships.clone();
		self.links = parent.links.clone();
		self.meta = parent.meta.clone();
		self.key_transform = parent.key_transform;
		self
	}

	/// Obtain the id from a named accessor instead of the default `id`
	pub fn id_accessor(mut self, accessor: impl Into<String>) -> Self {
		self.id = IdSource::Accessor(accessor.into());
		self
	}

	/// Obtain the id from a computation over the record and the complete
	/// input collection
	pub fn id_with<F>(mut self, computation: F) -> Self
	where
		F: Fn(&dyn Record, &[RecordHandle]) -> Value + Send + Sync + 'static,
	{
		self.id = IdSource::Computation(Arc::new(computation));
		self
	}

	/// Declare an attribute read from the accessor of the same name
	pub fn attribute(self, name: impl Into<String>) -> Self {
		let name = name.into();
		let accessor = name.clone();
		self.attribute_as(name, accessor)
	}

	/// Declare a batch of plain attributes
	pub fn attributes<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for name in names {
			self = self.attribute(name);
		}
		self
	}

	/// Declare an attribute read from a differently named accessor
	pub fn attribute_as(mut self, name: impl Into<String>, accessor: impl Into<String>) -> Self {
		self.upsert_attribute(AttributeSpec {
			name: name.into(),
			source: ValueSource::Accessor(accessor.into()),
		});
		self
	}

	/// Declare a computed attribute
	pub fn attribute_with<F>(mut self, name: impl Into<String>, computation: F) -> Self
	where
		F: Fn(&dyn Record) -> Value + Send + Sync + 'static,
	{
		self.upsert_attribute(AttributeSpec {
			name: name.into(),
			source: ValueSource::Computation(Arc::new(computation)),
		});
		self
	}

	/// Declare a relationship; redeclaring a name replaces its spec
	pub fn relationship(mut self, relationship: Relationship) -> Self {
		if let Some(existing) = self
			.relationships
			.iter_mut()
			.find(|r| r.name == relationship.name)
		{
			*existing = relationship;
		} else {
			self.relationships.push(relationship);
		}
		self
	}

	/// Shorthand for `relationship(Relationship::has_many(name))`
	pub fn has_many(self, name: impl Into<String>) -> Self {
		self.relationship(Relationship::has_many(name))
	}

	/// Shorthand for `relationship(Relationship::has_one(name))`
	pub fn has_one(self, name: impl Into<String>) -> Self {
		self.relationship(Relationship::has_one(name))
	}

	/// Shorthand for `relationship(Relationship::belongs_to(name))`
	pub fn belongs_to(self, name: impl Into<String>) -> Self {
		self.relationship(Relationship::belongs_to(name))
	}

	/// Declare a link read from the accessor of the same name
	pub fn link(self, name: impl Into<String>) -> Self {
		let name = name.into();
		let accessor = name.clone();
		self.link_accessor(name, accessor)
	}

	/// Declare a link read from a differently named accessor
	pub fn link_accessor(mut self, name: impl Into<String>, accessor: impl Into<String>) -> Self {
		self.upsert_link(LinkSpec {
			name: name.into(),
			source: ValueSource::Accessor(accessor.into()),
		});
		self
	}

	/// Declare a computed link
	pub fn link_with<F>(mut self, name: impl Into<String>, computation: F) -> Self
	where
		F: Fn(&dyn Record) -> Value + Send + Sync + 'static,
	{
		self.upsert_link(LinkSpec {
			name: name.into(),
			source: ValueSource::Computation(Arc::new(computation)),
		});
		self
	}

	/// Declare the resource-level meta computation
	pub fn meta<F>(mut self, computation: F) -> Self
	where
		F: Fn(&dyn Record) -> Value + Send + Sync + 'static,
	{
		self.meta = Some(Arc::new(computation));
		self
	}

	/// Set the key-transform policy for every key this descriptor emits
	pub fn key_transform(mut self, key_transform: KeyTransform) -> Self {
		self.key_transform = key_transform;
		self
	}

	/// Freeze the declarations into an immutable descriptor
	pub fn build(self) -> ResourceDescriptor {
		ResourceDescriptor {
			resource_type: self.resource_type,
			id: self.id,
			attributes: self.attributes,
			relationships: self.relationships,
			links: self.links,
			meta: self.meta,
			key_transform: self.key_transform,
		}
	}

	fn upsert_attribute(&mut self, spec: AttributeSpec) {
		if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == spec.name) {
			*existing = spec;
		} else {
			self.attributes.push(spec);
		}
	}

	fn upsert_link(&mut self, spec: LinkSpec) {
		if let Some(existing) = self.links.iter_mut().find(|l| l.name == spec.name) {
			*existing = spec;
		} else {
			self.links.push(spec);
		}
	}
}
