//! Resource-graph construction
//!
//! Walks from the root record(s) through declared relationships, builds
//! one resource hash per record, and folds every expanded related
//! resource into a deduplicated included set. Expansion is driven by the
//! include tree, so recursion depth is bounded by the requested paths and
//! cycles in the record graph cannot cause non-termination.

use crate::descriptor::{ResourceDescriptor, stringify_id};
use crate::error::{SerializeError, SerializeResult};
use crate::include::IncludeTree;
use crate::key_transform::KeyTransform;
use crate::record::{Record, RecordHandle};
use crate::registry::SerializerRegistry;
use crate::relationship::{Cardinality, Relationship, singularize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Per-call accumulation state
///
/// Owned exclusively by one serialize invocation and discarded when it
/// returns; never shared across calls.
pub(crate) struct SerializationContext<'a> {
	registry: &'a SerializerRegistry,
	transform_override: Option<KeyTransform>,
	included: Vec<Value>,
	seen: HashSet<(String, String)>,
}

impl<'a> SerializationContext<'a> {
	pub(crate) fn new(
		registry: &'a SerializerRegistry,
		transform_override: Option<KeyTransform>,
	) -> Self {
		Self {
			registry,
			transform_override,
			included: Vec::new(),
			seen: HashSet::new(),
		}
	}

	pub(crate) fn included_count(&self) -> usize {
		self.included.len()
	}

	/// The included set, in first-insertion order
	pub(crate) fn into_included(self) -> Vec<Value> {
		self.included
	}

	/// The serialize-call override wins over the descriptor's own policy
	fn transform_for(&self, descriptor: &ResourceDescriptor) -> KeyTransform {
		self.transform_override.unwrap_or(descriptor.key_transform())
	}
}

/// Primary data for a single record
pub(crate) fn build_one(
	descriptor: &Arc<ResourceDescriptor>,
	record: &RecordHandle,
	include: &IncludeTree,
	ctx: &mut SerializationContext,
) -> SerializeResult<Value> {
	build_resource(descriptor, record, std::slice::from_ref(record), include, ctx)
}

/// Primary data for a collection, input order preserved
pub(crate) fn build_many(
	descriptor: &Arc<ResourceDescriptor>,
	records: &[RecordHandle],
	include: &IncludeTree,
	ctx: &mut SerializationContext,
) -> SerializeResult<Value> {
	let mut data = Vec::with_capacity(records.len());
	for record in records {
		data.push(build_resource(descriptor, record, records, include, ctx)?);
	}
	Ok(Value::Array(data))
}

/// One resource hash: `{id, type, attributes, relationships, links?, meta?}`
fn build_resource(
	descriptor: &Arc<ResourceDescriptor>,
	record: &RecordHandle,
	collection: &[RecordHandle],
	include: &IncludeTree,
	ctx: &mut SerializationContext,
) -> SerializeResult<Value> {
	let transform = ctx.transform_for(descriptor);
	let resource_type =
		transform.apply(record.resource_type().unwrap_or(descriptor.resource_type()));
	let id = descriptor.resolve_id(record.as_ref(), collection)?;

	let mut attributes = Map::new();
	for spec in descriptor.attributes() {
		let value = descriptor.resolve_value(record.as_ref(), &spec.source)?;
		attributes.insert(transform.apply(&spec.name), value);
	}

	let mut relationships = Map::new();
	for relationship in descriptor.relationships() {
		let subtree = include.child(relationship.name());
		let object = build_relationship(relationship, record, transform, subtree, ctx)?;
		relationships.insert(transform.apply(relationship.name()), object);
	}

	let mut resource = Map::new();
	resource.insert("id".to_string(), Value::String(id));
	resource.insert("type".to_string(), Value::String(resource_type));
	resource.insert("attributes".to_string(), Value::Object(attributes));
	resource.insert("relationships".to_string(), Value::Object(relationships));

	if !descriptor.links().is_empty() {
		let mut links = Map::new();
		for spec in descriptor.links() {
			let value = descriptor.resolve_value(record.as_ref(), &spec.source)?;
			links.insert(transform.apply(&spec.name), value);
		}
		resource.insert("links".to_string(), Value::Object(links));
	}

	if let Some(meta) = descriptor.meta() {
		resource.insert("meta".to_string(), meta(record.as_ref()));
	}

	Ok(Value::Object(resource))
}

/// One relationship object: `{data: linkage}`, with targets folded into
/// the included set when the relationship is on the expansion set
fn build_relationship(
	relationship: &Relationship,
	record: &RecordHandle,
	transform: KeyTransform,
	include: Option<&IncludeTree>,
	ctx: &mut SerializationContext,
) -> SerializeResult<Value> {
	let linkage = match include {
		None => link_only(relationship, record, transform, ctx)?,
		Some(subtree) => expand(relationship, record, transform, subtree, ctx)?,
	};
	let mut object = Map::new();
	object.insert("data".to_string(), linkage);
	Ok(Value::Object(object))
}

/// Linkage without expansion
///
/// Prefers the owner-side id accessor so no target descriptor is needed
/// for ids alone; falls back to materializing the related records.
fn link_only(
	relationship: &Relationship,
	record: &RecordHandle,
	transform: KeyTransform,
	ctx: &mut SerializationContext,
) -> SerializeResult<Value> {
	if relationship.related.is_none() {
		if let Some(ids) = record.value(&relationship.owner_id_accessor()) {
			let resource_type = transform.apply(&static_type(relationship, ctx));
			return Ok(linkage_from_ids(relationship.cardinality(), ids, &resource_type));
		}
	}

	let targets = resolve_targets(relationship, record)?;
	let fallback_type = transform.apply(&static_type(relationship, ctx));
	let mut entries = Vec::with_capacity(targets.len());
	for target in &targets {
		// An explicit record-type override is static; only without one
		// does a record-reported type dispatch polymorphically.
		let resource_type = if relationship.record_type.is_some() {
			fallback_type.clone()
		} else {
			target
				.resource_type()
				.map(|t| transform.apply(t))
				.unwrap_or_else(|| fallback_type.clone())
		};
		let id = target
			.value(relationship.target_id_accessor())
			.ok_or_else(|| {
				SerializeError::relationship(
					relationship.name(),
					format!(
						"id accessor '{}' is missing on a related record",
						relationship.target_id_accessor()
					),
				)
			})?;
		entries.push(linkage_entry(&id, &resource_type));
	}
	Ok(fold_linkage(relationship.cardinality(), entries))
}

/// Linkage plus full-resource expansion into the included set
fn expand(
	relationship: &Relationship,
	record: &RecordHandle,
	transform: KeyTransform,
	subtree: &IncludeTree,
	ctx: &mut SerializationContext,
) -> SerializeResult<Value> {
	let targets = resolve_targets(relationship, record)?;
	let mut entries = Vec::with_capacity(targets.len());
	for target in &targets {
		let descriptor = target_descriptor(relationship, target, ctx)?;
		let target_transform = ctx.transform_for(&descriptor);
		let resource_type = target_transform
			.apply(target.resource_type().unwrap_or(descriptor.resource_type()));
		let id = descriptor.resolve_id(target.as_ref(), &targets)?;

		// First-seen wins: later encounters of the same identity are
		// linked but not re-serialized.
		let identity = (resource_type.clone(), id);
		if !ctx.seen.contains(&identity) {
			ctx.seen.insert(identity);
			let resource = build_resource(&descriptor, target, &targets, subtree, ctx)?;
			ctx.included.push(resource);
		}

		// An explicit record-type override wins for linkage typing even
		// when the target is fully expanded.
		let linkage_type = match &relationship.record_type {
			Some(record_type) => target_transform.apply(record_type),
			None => resource_type,
		};
		// Linkage ids always come from the relationship's id accessor, so
		// they do not change when the relationship is added to `include`.
		let linkage_id = target
			.value(relationship.target_id_accessor())
			.ok_or_else(|| {
				SerializeError::relationship(
					relationship.name(),
					format!(
						"id accessor '{}' is missing on a related record",
						relationship.target_id_accessor()
					),
				)
			})?;
		entries.push(linkage_entry(&linkage_id, &linkage_type));
	}
	Ok(fold_linkage(relationship.cardinality(), entries))
}

fn resolve_targets(
	relationship: &Relationship,
	record: &RecordHandle,
) -> SerializeResult<Vec<RecordHandle>> {
	relationship.resolve_related(record).ok_or_else(|| {
		SerializeError::relationship(
			relationship.name(),
			format!("accessor '{}' is missing on the record", relationship.name()),
		)
	})
}

/// Target type when no concrete record is consulted: explicit override,
/// then the registered target descriptor's type, then the singularized
/// relationship name.
fn static_type(relationship: &Relationship, ctx: &SerializationContext) -> String {
	if let Some(record_type) = &relationship.record_type {
		return record_type.clone();
	}
	if let Some(serializer) = &relationship.serializer {
		if let Some(descriptor) = ctx.registry.get(serializer) {
			return descriptor.resource_type().to_string();
		}
	}
	let inferred = singularize(relationship.name());
	match ctx.registry.get(&inferred) {
		Some(descriptor) => descriptor.resource_type().to_string(),
		None => inferred,
	}
}

/// Descriptor for one concrete target record: the record's own type wins
/// (polymorphic dispatch), then the relationship's configured serializer
/// and record type, then inference from the relationship name.
fn target_descriptor(
	relationship: &Relationship,
	target: &RecordHandle,
	ctx: &SerializationContext,
) -> SerializeResult<Arc<ResourceDescriptor>> {
	let mut candidates: Vec<String> = Vec::new();
	if let Some(resource_type) = target.resource_type() {
		candidates.push(resource_type.to_string());
	}
	if let Some(serializer) = &relationship.serializer {
		candidates.push(serializer.clone());
	}
	if let Some(record_type) = &relationship.record_type {
		candidates.push(record_type.clone());
	}
	candidates.push(singularize(relationship.name()));

	for candidate in &candidates {
		if let Some(descriptor) = ctx.registry.get(candidate) {
			return Ok(descriptor);
		}
	}
	Err(SerializeError::UnresolvableSerializer {
		name: candidates.into_iter().next().unwrap_or_default(),
		relationship: relationship.name().to_string(),
	})
}

fn linkage_from_ids(cardinality: Cardinality, ids: Value, resource_type: &str) -> Value {
	match cardinality {
		Cardinality::One => match ids {
			Value::Null => Value::Null,
			id => linkage_entry(&id, resource_type),
		},
		Cardinality::Many => {
			let items = match ids {
				Value::Array(items) => items,
				Value::Null => Vec::new(),
				single => vec![single],
			};
			Value::Array(
				items
					.iter()
					.map(|id| linkage_entry(id, resource_type))
					.collect(),
			)
		}
	}
}

fn linkage_entry(id: &Value, resource_type: &str) -> Value {
	let mut entry = Map::new();
	entry.insert("id".to_string(), Value::String(stringify_id(id)));
	entry.insert("type".to_string(), Value::String(resource_type.to_string()));
	Value::Object(entry)
}

fn fold_linkage(cardinality: Cardinality, entries: Vec<Value>) -> Value {
	match cardinality {
		Cardinality::One => entries.into_iter().next().unwrap_or(Value::Null),
		Cardinality::Many => Value::Array(entries),
	}
}
