//! Declarative JSON:API serialization
//!
//! Converts in-memory records into JSON:API documents: primary `data`,
//! a deduplicated `included` section for requested relationship paths,
//! and optional `meta`/`links`, with configurable key casing.
//!
//! Resource shapes are declared once with [`DescriptorBuilder`] and
//! compiled into immutable [`ResourceDescriptor`]s; a
//! [`JsonApiSerializer`] then walks the record graph guided by the
//! requested include paths.
//!
//! ```
//! use jsonapi_serializer::{
//!     JsonApiSerializer, ObjectRecord, ResourceDescriptor, SerializeOptions,
//!     SerializerRegistry,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut registry = SerializerRegistry::new();
//! registry.register(ResourceDescriptor::builder("actor").attribute("name").build());
//! let movie = registry.register(
//!     ResourceDescriptor::builder("movie")
//!         .attributes(["name", "release_year"])
//!         .has_many("actors")
//!         .build(),
//! );
//! let serializer = JsonApiSerializer::new(Arc::new(registry));
//!
//! let actor = ObjectRecord::new()
//!     .with_value("id", json!(9))
//!     .with_value("name", json!("Jane"))
//!     .into_handle();
//! let record = ObjectRecord::new()
//!     .with_value("id", json!(1))
//!     .with_value("name", json!("Foo"))
//!     .with_value("release_year", json!(2008))
//!     .with_related("actors", vec![actor])
//!     .into_handle();
//!
//! let options = SerializeOptions {
//!     include: vec!["actors".to_string()],
//!     ..Default::default()
//! };
//! let document = serializer.serialize(&movie, record, &options).unwrap();
//! assert_eq!(document["included"][0]["type"], json!("actor"));
//! ```

pub mod descriptor;
pub mod document;
pub mod error;
mod graph;
pub mod include;
pub mod key_transform;
pub mod record;
pub mod registry;
pub mod relationship;
pub mod serializer;

pub use descriptor::{CollectionFn, DescriptorBuilder, RecordFn, ResourceDescriptor};
pub use document::assemble;
pub use error::{SerializeError, SerializeResult};
pub use include::IncludeTree;
pub use key_transform::KeyTransform;
pub use record::{ObjectRecord, Record, RecordHandle};
pub use registry::SerializerRegistry;
pub use relationship::{Cardinality, RelatedFn, Relationship, RelationshipKind};
pub use serializer::{JsonApiSerializer, Records, SerializeOptions};
