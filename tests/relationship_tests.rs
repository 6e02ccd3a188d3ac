//! Relationship linkage, nested includes, dedup, and error propagation

mod common;

use assert_json_diff::assert_json_eq;
use jsonapi_serializer::{
	JsonApiSerializer, ObjectRecord, Record, RecordHandle, Relationship, ResourceDescriptor,
	SerializeError, SerializeOptions, SerializerRegistry,
};
use serde_json::json;
use std::rc::Rc;
use std::sync::Arc;

fn serializer_with(registry: SerializerRegistry) -> JsonApiSerializer {
	JsonApiSerializer::new(Arc::new(registry))
}

fn include(paths: &[&str]) -> SerializeOptions {
	SerializeOptions {
		include: paths.iter().map(|p| p.to_string()).collect(),
		..Default::default()
	}
}

#[test]
fn test_nested_include_expands_both_levels() {
	let mut registry = SerializerRegistry::new();
	registry.register(ResourceDescriptor::builder("agency").attribute("name").build());
	registry.register(
		ResourceDescriptor::builder("actor")
			.attributes(["name", "email"])
			.belongs_to("agency")
			.has_many("awards")
			.build(),
	);
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attribute("name")
			.has_many("actors")
			.build(),
	);
	let serializer = serializer_with(registry);

	let agency = ObjectRecord::new()
		.with_value("id", json!(432))
		.with_value("name", json!("Test Agency"))
		.into_handle();
	let actor = ObjectRecord::new()
		.with_value("id", json!(1))
		.with_value("name", json!("Test Actor 1"))
		.with_value("email", json!("test1@email.com"))
		.with_value("award_ids", json!([9, 10]))
		.with_related("agency", vec![agency])
		.into_handle();
	let movie = ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.with_related("actors", vec![actor])
		.into_handle();

	let document = serializer
		.serialize(&movie_descriptor, movie, &include(&["actors.agency"]))
		.unwrap();

	let included = document["included"].as_array().unwrap();
	let types: Vec<&str> = included
		.iter()
		.map(|resource| resource["type"].as_str().unwrap())
		.collect();
	assert_eq!(types, ["agency", "actor"]);

	// sibling relationship of the expanded actor stays link-only
	let actor_resource = &included[1];
	assert_json_eq!(
		actor_resource["relationships"]["awards"]["data"],
		json!([
			{"id": "9", "type": "award"},
			{"id": "10", "type": "award"},
		])
	);
	assert!(!types.contains(&"award"));
}

#[test]
fn test_shared_target_included_once() {
	let registry = common::base_registry();
	let movie_descriptor = registry.get("movie").unwrap();
	let serializer = serializer_with(registry);

	let shared_actor = common::actor(1, "Test Actor 1");
	let first = common::movie_with_actors(vec![
		Rc::clone(&shared_actor),
		common::actor(2, "Test Actor 2"),
	]);
	let second = common::movie_with_actors(vec![shared_actor]);

	let document = serializer
		.serialize(&movie_descriptor, vec![first, second], &include(&["actors"]))
		.unwrap();

	let included = document["included"].as_array().unwrap();
	let ids: Vec<&str> = included
		.iter()
		.map(|resource| resource["id"].as_str().unwrap())
		.collect();
	assert_eq!(ids, ["1", "2"]);
}

#[test]
fn test_relationship_computation_with_id_accessor() {
	let mut registry = SerializerRegistry::new();
	registry.register(
		ResourceDescriptor::builder("award")
			.id_accessor("imdb_award_id")
			.attribute("title")
			.build(),
	);
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attribute("name")
			.relationship(
				Relationship::has_many("awards")
					.id_accessor("imdb_award_id")
					.with(|movie: &RecordHandle| {
						movie
							.related("actors")
							.unwrap_or_default()
							.iter()
							.flat_map(|actor| actor.related("awards").unwrap_or_default())
							.collect()
					}),
			)
			.build(),
	);
	let serializer = serializer_with(registry);

	let award = |id: i64, title: &str| -> RecordHandle {
		ObjectRecord::new()
			.with_value("id", json!(id))
			.with_value("imdb_award_id", json!(id + 100))
			.with_value("title", json!(title))
			.into_handle()
	};
	let actor_with_awards = |id: i64, awards: Vec<RecordHandle>| -> RecordHandle {
		ObjectRecord::new()
			.with_value("id", json!(id))
			.with_related("awards", awards)
			.into_handle()
	};
	let movie = ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.with_related(
			"actors",
			vec![
				actor_with_awards(1, vec![award(9, "Test Award 9")]),
				actor_with_awards(3, vec![award(28, "Test Award 28")]),
			],
		)
		.into_handle();

	// without include: linkage ids come from each award's imdb_award_id
	let document = serializer
		.serialize(&movie_descriptor, Rc::clone(&movie), &SerializeOptions::default())
		.unwrap();
	assert_json_eq!(
		document["data"]["relationships"]["awards"]["data"],
		json!([
			{"id": "109", "type": "award"},
			{"id": "128", "type": "award"},
		])
	);

	// with include: full award resources, ids from the award descriptor
	let document = serializer
		.serialize(&movie_descriptor, movie, &include(&["awards"]))
		.unwrap();
	let included = document["included"].as_array().unwrap();
	assert_eq!(included.len(), 2);
	assert_eq!(included[0]["id"], json!("109"));
	assert_eq!(included[0]["attributes"]["title"], json!("Test Award 9"));
	assert_eq!(included[1]["id"], json!("128"));
}

#[test]
fn test_linkage_ids_stable_across_include() {
	let mut registry = SerializerRegistry::new();
	// the award serializer keeps the default `id` source; only the
	// relationship overrides its id accessor
	registry.register(ResourceDescriptor::builder("award").attribute("title").build());
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attribute("name")
			.relationship(
				Relationship::has_many("awards")
					.id_accessor("imdb_award_id")
					.with(|movie: &RecordHandle| movie.related("awards").unwrap_or_default()),
			)
			.build(),
	);
	let serializer = serializer_with(registry);

	let award = ObjectRecord::new()
		.with_value("id", json!(9))
		.with_value("imdb_award_id", json!(109))
		.with_value("title", json!("Test Award 9"))
		.into_handle();
	let movie = ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.with_related("awards", vec![award])
		.into_handle();

	let plain = serializer
		.serialize(&movie_descriptor, Rc::clone(&movie), &SerializeOptions::default())
		.unwrap();
	let expanded = serializer
		.serialize(&movie_descriptor, movie, &include(&["awards"]))
		.unwrap();

	// the relationship's own id accessor drives linkage either way
	assert_json_eq!(
		plain["data"]["relationships"]["awards"]["data"],
		json!([{"id": "109", "type": "award"}])
	);
	assert_eq!(
		plain["data"]["relationships"]["awards"],
		expanded["data"]["relationships"]["awards"]
	);
	// the included resource is still identified by its own serializer
	assert_eq!(expanded["included"][0]["id"], json!("9"));
}

#[test]
fn test_belongs_to_computation() {
	let mut registry = SerializerRegistry::new();
	registry.register(ResourceDescriptor::builder("state").attribute("name").build());
	let actor_descriptor = registry.register(
		ResourceDescriptor::builder("actor")
			.attribute("name")
			.relationship(Relationship::belongs_to("state").with(|actor: &RecordHandle| {
				actor
					.related("agency")
					.unwrap_or_default()
					.iter()
					.flat_map(|agency| agency.related("state").unwrap_or_default())
					.collect()
			}))
			.build(),
	);
	let serializer = serializer_with(registry);

	let state = ObjectRecord::new()
		.with_value("id", json!(1))
		.with_value("name", json!("Test State 1"))
		.into_handle();
	let agency = ObjectRecord::new()
		.with_value("id", json!(432))
		.with_related("state", vec![state])
		.into_handle();
	let actor = ObjectRecord::new()
		.with_value("id", json!(1))
		.with_value("name", json!("Test Actor 1"))
		.with_related("agency", vec![agency])
		.into_handle();

	let document = serializer
		.serialize(&actor_descriptor, Rc::clone(&actor), &SerializeOptions::default())
		.unwrap();
	assert_json_eq!(
		document["data"]["relationships"]["state"]["data"],
		json!({"id": "1", "type": "state"})
	);

	let document = serializer
		.serialize(&actor_descriptor, actor, &include(&["state"]))
		.unwrap();
	assert_eq!(document["included"][0]["attributes"]["name"], json!("Test State 1"));
}

#[test]
fn test_relationship_overrides() {
	let mut registry = SerializerRegistry::new();
	registry.register_as(
		"my_area",
		ResourceDescriptor::builder("area").attribute("name").build(),
	);
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attribute("name")
			.relationship(
				Relationship::belongs_to("area")
					.id_accessor("blah_id")
					.record_type("awesome_area")
					.serializer("my_area"),
			)
			.build(),
	);
	let serializer = serializer_with(registry);

	let area = ObjectRecord::new()
		.with_value("id", json!(7))
		.with_value("blah_id", json!(7))
		.with_value("name", json!("Test Area"))
		.into_handle();
	let movie = ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.with_value("blah_id", json!(7))
		.with_related("area", vec![area])
		.into_handle();

	let document = serializer
		.serialize(&movie_descriptor, movie, &include(&["area"]))
		.unwrap();

	// record_type override wins for linkage typing
	assert_json_eq!(
		document["data"]["relationships"]["area"]["data"],
		json!({"id": "7", "type": "awesome_area"})
	);
	// the explicitly selected serializer builds the included resource
	assert_eq!(document["included"][0]["attributes"]["name"], json!("Test Area"));
}

#[test]
fn test_polymorphic_target_uses_record_type() {
	let mut registry = SerializerRegistry::new();
	registry.register(ResourceDescriptor::builder("actor").attribute("name").build());
	registry.register(
		ResourceDescriptor::builder("director")
			.attributes(["name", "style"])
			.build(),
	);
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attribute("name")
			.has_many("credits")
			.build(),
	);
	let serializer = serializer_with(registry);

	let actor = ObjectRecord::new()
		.with_value("id", json!(1))
		.with_value("name", json!("Test Actor 1"))
		.with_resource_type("actor")
		.into_handle();
	let director = ObjectRecord::new()
		.with_value("id", json!(2))
		.with_value("name", json!("Test Director"))
		.with_value("style", json!("noir"))
		.with_resource_type("director")
		.into_handle();
	let movie = ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.with_related("credits", vec![actor, director])
		.into_handle();

	let document = serializer
		.serialize(&movie_descriptor, movie, &include(&["credits"]))
		.unwrap();

	assert_json_eq!(
		document["data"]["relationships"]["credits"]["data"],
		json!([
			{"id": "1", "type": "actor"},
			{"id": "2", "type": "director"},
		])
	);
	let included = document["included"].as_array().unwrap();
	assert_eq!(included[0]["type"], json!("actor"));
	assert_eq!(included[1]["type"], json!("director"));
	assert_eq!(included[1]["attributes"]["style"], json!("noir"));
}

#[test]
fn test_empty_relationships() {
	let mut registry = SerializerRegistry::new();
	registry.register(ResourceDescriptor::builder("actor").attribute("name").build());
	registry.register(ResourceDescriptor::builder("area").attribute("name").build());
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attribute("name")
			.has_many("actors")
			.has_one("area")
			.build(),
	);
	let serializer = serializer_with(registry);

	let movie = ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.with_value("area_id", json!(null))
		.with_related("actors", vec![])
		.into_handle();

	let document = serializer
		.serialize(&movie_descriptor, movie, &SerializeOptions::default())
		.unwrap();

	assert_json_eq!(document["data"]["relationships"]["actors"]["data"], json!([]));
	assert_json_eq!(document["data"]["relationships"]["area"]["data"], json!(null));
}

#[test]
fn test_unknown_include_path_is_ignored() {
	let registry = common::base_registry();
	let movie_descriptor = registry.get("movie").unwrap();
	let serializer = serializer_with(registry);

	let plain = serializer
		.serialize(&movie_descriptor, common::movie(), &SerializeOptions::default())
		.unwrap();
	let with_unknown = serializer
		.serialize(
			&movie_descriptor,
			common::movie(),
			&include(&["garbage", "actors.nonexistent.deeper"]),
		)
		.unwrap();

	// unknown segments expand nothing beyond the declared relationships
	assert_eq!(plain["data"], with_unknown["data"]);
	assert!(with_unknown["included"].as_array().is_some());
}

#[test]
fn test_missing_attribute_accessor_errors() {
	let mut registry = SerializerRegistry::new();
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attributes(["name", "box_office"])
			.build(),
	);
	let serializer = serializer_with(registry);

	let err = serializer
		.serialize(&movie_descriptor, common::movie(), &SerializeOptions::default())
		.unwrap_err();
	assert_eq!(
		err,
		SerializeError::MissingAccessor {
			resource_type: "movie".to_string(),
			accessor: "box_office".to_string(),
		}
	);
}

#[test]
fn test_unresolvable_serializer_errors() {
	let mut registry = SerializerRegistry::new();
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attribute("name")
			.has_many("widgets")
			.build(),
	);
	let serializer = serializer_with(registry);

	let widget = ObjectRecord::new().with_value("id", json!(1)).into_handle();
	let movie = ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.with_related("widgets", vec![widget])
		.into_handle();

	let err = serializer
		.serialize(&movie_descriptor, movie, &include(&["widgets"]))
		.unwrap_err();
	assert_eq!(
		err,
		SerializeError::UnresolvableSerializer {
			name: "widget".to_string(),
			relationship: "widgets".to_string(),
		}
	);
	assert_eq!(err.relationship_name(), Some("widgets"));
}

#[test]
fn test_relationship_resolution_error() {
	let mut registry = SerializerRegistry::new();
	registry.register(ResourceDescriptor::builder("area").attribute("name").build());
	let movie_descriptor = registry.register(
		ResourceDescriptor::builder("movie")
			.attribute("name")
			.has_one("area")
			.build(),
	);
	let serializer = serializer_with(registry);

	// neither `area_id` nor `area` exists on the record
	let movie = ObjectRecord::new()
		.with_value("id", json!(23))
		.with_value("name", json!("Foo"))
		.into_handle();

	let err = serializer
		.serialize(&movie_descriptor, movie, &SerializeOptions::default())
		.unwrap_err();
	assert!(matches!(err, SerializeError::RelationshipResolution { .. }));
	assert_eq!(err.relationship_name(), Some("area"));
}

#[test]
fn test_descriptor_inheritance_overrides_link() {
	let mut registry = SerializerRegistry::new();
	let parent = ResourceDescriptor::builder("movie")
		.attributes(["name", "release_year"])
		.link("url")
		.build();
	let action_movie = registry.register_as(
		"action_movie",
		ResourceDescriptor::builder("movie")
			.extending(&parent)
			.link_with("url", |record| {
				let id = record.value("id").and_then(|v| v.as_i64()).unwrap_or_default();
				json!(format!("/action-movie/{id}"))
			})
			.build(),
	);
	let movie_descriptor = registry.register(parent);
	let serializer = serializer_with(registry);

	let base = serializer
		.serialize(&movie_descriptor, common::movie(), &SerializeOptions::default())
		.unwrap();
	assert_eq!(base["data"]["links"]["url"], json!("http://movies.com/23"));

	let action = serializer
		.serialize(&action_movie, common::movie(), &SerializeOptions::default())
		.unwrap();
	assert_eq!(action["data"]["links"]["url"], json!("/action-movie/23"));
	// inherited attributes survive the override
	assert_eq!(action["data"]["attributes"]["release_year"], json!(2008));
}
