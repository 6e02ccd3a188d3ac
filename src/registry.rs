//! Registry of compiled resource descriptors
//!
//! Relationships name their target serializer (explicitly, via a record's
//! own resource type, or by inference from the relationship name); the
//! registry resolves those names to descriptors at expansion time.

use crate::descriptor::ResourceDescriptor;
use std::collections::HashMap;
use std::sync::Arc;

/// Name-to-descriptor lookup table
///
/// Registering under an existing name replaces the previous descriptor;
/// that replacement is the explicit "rebuild descriptor" operation and
/// must not race concurrent serialization.
///
/// # Examples
///
/// ```
/// use jsonapi_serializer::{ResourceDescriptor, SerializerRegistry};
///
/// let mut registry = SerializerRegistry::new();
/// registry.register(ResourceDescriptor::builder("movie").attribute("name").build());
/// assert!(registry.contains("movie"));
/// ```
#[derive(Default)]
pub struct SerializerRegistry {
	descriptors: HashMap<String, Arc<ResourceDescriptor>>,
}

impl SerializerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a descriptor under its own resource-type name
	pub fn register(&mut self, descriptor: ResourceDescriptor) -> Arc<ResourceDescriptor> {
		let descriptor = Arc::new(descriptor);
		self.descriptors
			.insert(descriptor.resource_type().to_string(), Arc::clone(&descriptor));
		descriptor
	}

	/// Register a descriptor under an explicit serializer name
	///
	/// Used when a relationship selects its serializer by a name other
	/// than the target's resource type.
	pub fn register_as(
		&mut self,
		name: impl Into<String>,
		descriptor: ResourceDescriptor,
	) -> Arc<ResourceDescriptor> {
		let descriptor = Arc::new(descriptor);
		self.descriptors.insert(name.into(), Arc::clone(&descriptor));
		descriptor
	}

	pub fn get(&self, name: &str) -> Option<Arc<ResourceDescriptor>> {
		self.descriptors.get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.descriptors.contains_key(name)
	}
}
