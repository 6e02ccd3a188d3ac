//! Shared fixtures: a small movie catalog record graph

#![allow(dead_code)]

use jsonapi_serializer::{ObjectRecord, Record, RecordHandle, ResourceDescriptor, SerializerRegistry};
use serde_json::json;

pub fn actor(id: i64, name: &str) -> RecordHandle {
	ObjectRecord::new()
		.with_value("id", json!(id))
		.with_value("name", json!(name))
		.with_value("email", json!(format!("test{id}@email.com")))
		.into_handle()
}

/// A movie with the given actors; scalar accessors mirror what a host
/// model would expose, including the `actor_ids` foreign-key list.
pub fn movie_with_actors(actors: Vec<RecordHandle>) -> RecordHandle {
	let actor_ids: Vec<_> = actors
		.iter()
		.filter_map(|actor| actor.value("id"))
		.collect();
	ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.with_value("release_year", json!(2008))
		.with_value("owner_id", json!(3))
		.with_value("url", json!("http://movies.com/23"))
		.with_value("actor_ids", json!(actor_ids))
		.with_related("actors", actors)
		.into_handle()
}

pub fn movie() -> RecordHandle {
	movie_with_actors(vec![actor(1, "Test Actor 1"), actor(2, "Test Actor 2")])
}

/// Registry with the `movie` and `actor` descriptors every test starts
/// from
pub fn base_registry() -> SerializerRegistry {
	let mut registry = SerializerRegistry::new();
	registry.register(
		ResourceDescriptor::builder("actor")
			.attributes(["name", "email"])
			.build(),
	);
	registry.register(
		ResourceDescriptor::builder("movie")
			.attributes(["name", "release_year"])
			.has_many("actors")
			.build(),
	);
	registry
}
