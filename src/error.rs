//! Error types for serialization operations

use thiserror::Error;

/// Result alias used throughout the crate
pub type SerializeResult<T> = Result<T, SerializeError>;

/// Error type for serialization failures
///
/// Every variant is fatal to the `serialize` call that raised it; no
/// partial document is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SerializeError {
	/// An attribute, id, link, or meta spec names an accessor that is
	/// absent on the record being serialized
	#[error("accessor '{accessor}' is not available on a '{resource_type}' record")]
	MissingAccessor {
		resource_type: String,
		accessor: String,
	},

	/// A relationship's target-record lookup failed
	#[error("failed to resolve relationship '{relationship}': {reason}")]
	RelationshipResolution {
		relationship: String,
		reason: String,
	},

	/// A relationship was requested for full expansion but no descriptor
	/// is registered under any of its candidate serializer names
	#[error("no serializer registered under '{name}' for relationship '{relationship}'")]
	UnresolvableSerializer {
		name: String,
		relationship: String,
	},
}

impl SerializeError {
	pub(crate) fn missing_accessor(resource_type: &str, accessor: &str) -> Self {
		Self::MissingAccessor {
			resource_type: resource_type.to_string(),
			accessor: accessor.to_string(),
		}
	}

	pub(crate) fn relationship(relationship: &str, reason: impl Into<String>) -> Self {
		Self::RelationshipResolution {
			relationship: relationship.to_string(),
			reason: reason.into(),
		}
	}

	/// The relationship name attached to the error, when one applies
	pub fn relationship_name(&self) -> Option<&str> {
		match self {
			Self::RelationshipResolution { relationship, .. } => Some(relationship),
			Self::UnresolvableSerializer { relationship, .. } => Some(relationship),
			Self::MissingAccessor { .. } => None,
		}
	}
}
