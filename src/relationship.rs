//! Relationship declarations
//!
//! A [`Relationship`] describes one edge of the resource graph: its output
//! name, cardinality, how linkage ids are obtained, and how the target
//! serializer is chosen. The actual linkage and expansion work happens in
//! the graph builder, which consults these declarations.

use crate::record::{Record, RecordHandle};
use std::sync::Arc;

/// Computation returning the related record(s) directly, overriding the
/// default accessor-by-name lookup
pub type RelatedFn = Arc<dyn Fn(&RecordHandle) -> Vec<RecordHandle> + Send + Sync>;

/// Which declaration produced the relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
	BelongsTo,
	HasOne,
	HasMany,
}

/// Output shape of the relationship's linkage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
	/// Linkage is a single `{id, type}` object, or `null` with no target
	One,
	/// Linkage is an array of `{id, type}` objects
	Many,
}

/// Declarative configuration for one relationship
///
/// # Examples
///
/// ```
/// use jsonapi_serializer::Relationship;
///
/// let rel = Relationship::has_many("roles")
///     .id_accessor("roles_only_ids")
///     .record_type("super_role");
/// assert_eq!(rel.name(), "roles");
/// ```
#[derive(Clone)]
pub struct Relationship {
	pub(crate) name: String,
	pub(crate) kind: RelationshipKind,
	pub(crate) id_accessor: Option<String>,
	pub(crate) record_type: Option<String>,
	pub(crate) serializer: Option<String>,
	pub(crate) related: Option<RelatedFn>,
}

impl Relationship {
	fn new(name: impl Into<String>, kind: RelationshipKind) -> Self {
		Self {
			name: name.into(),
			kind,
			id_accessor: None,
			record_type: None,
			serializer: None,
			related: None,
		}
	}

	/// A to-one relationship whose foreign key lives on this record
	pub fn belongs_to(name: impl Into<String>) -> Self {
		Self::new(name, RelationshipKind::BelongsTo)
	}

	/// A to-one relationship
	pub fn has_one(name: impl Into<String>) -> Self {
		Self::new(name, RelationshipKind::HasOne)
	}

	/// A to-many relationship
	pub fn has_many(name: impl Into<String>) -> Self {
		Self::new(name, RelationshipKind::HasMany)
	}

	/// Override the id accessor
	///
	/// Without a computation the accessor is called on the owning record
	/// (default `{name}_id` / `{name}_ids`); with a computation it is
	/// called on each related record (default `id`).
	pub fn id_accessor(mut self, accessor: impl Into<String>) -> Self {
		self.id_accessor = Some(accessor.into());
		self
	}

	/// Override the emitted resource-type name for targets
	pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
		self.record_type = Some(record_type.into());
		self
	}

	/// Select the target serializer by registry name
	pub fn serializer(mut self, name: impl Into<String>) -> Self {
		self.serializer = Some(name.into());
		self
	}

	/// Supply the related records with a computation instead of the
	/// accessor named after the relationship
	pub fn with<F>(mut self, related: F) -> Self
	where
		F: Fn(&RecordHandle) -> Vec<RecordHandle> + Send + Sync + 'static,
	{
		self.related = Some(Arc::new(related));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> RelationshipKind {
		self.kind
	}

	pub fn cardinality(&self) -> Cardinality {
		match self.kind {
			RelationshipKind::HasMany => Cardinality::Many,
			RelationshipKind::BelongsTo | RelationshipKind::HasOne => Cardinality::One,
		}
	}

	/// Accessor used on the owning record for the linkage-only fast path
	///
	/// Defaults follow the singularized relationship name: `area` ->
	/// `area_id`, `roles` -> `role_ids`.
	pub(crate) fn owner_id_accessor(&self) -> String {
		match &self.id_accessor {
			Some(accessor) => accessor.clone(),
			None => match self.cardinality() {
				Cardinality::One => format!("{}_id", singularize(&self.name)),
				Cardinality::Many => format!("{}_ids", singularize(&self.name)),
			},
		}
	}

	/// Accessor used on each target record once targets are materialized
	pub(crate) fn target_id_accessor(&self) -> &str {
		self.id_accessor.as_deref().unwrap_or("id")
	}

	/// Related records: computation first, accessor-by-name otherwise
	pub(crate) fn resolve_related(&self, record: &RecordHandle) -> Option<Vec<RecordHandle>> {
		match &self.related {
			Some(related) => Some(related(record)),
			None => record.related(&self.name),
		}
	}
}

/// Naive singularization used to infer a target serializer name from a
/// relationship name (`actors` -> `actor`, `agencies` -> `agency`).
pub(crate) fn singularize(name: &str) -> String {
	if let Some(stem) = name.strip_suffix("ies") {
		format!("{stem}y")
	} else if let Some(stem) = name.strip_suffix('s') {
		stem.to_string()
	} else {
		name.to_string()
	}
}
