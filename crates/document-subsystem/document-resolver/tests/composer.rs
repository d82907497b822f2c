// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod fixture;

use std::sync::Arc;

use async_graphql_parser::types::FieldDefinition;
use common::{env_const::DOC_STORE_DEFAULT_LIMIT, value::Val};
use core_model::{
    primitive_type::PrimitiveType,
    schema::{FieldSchema, FieldType, ModelSchema, SchemaError},
    type_normalization::TypeDefinitionIntrospection,
    type_registry::TypeRegistry,
};
use core_resolver::{OperationKind, ResolverError, ValidationError};
use doc_env::MapEnvironment;
use doc_store::memory::{MemoryStore, MemoryStoreConfig};
use document_resolver::DocumentComposer;
use fixture::{params, seed, seeded_store, user_schema};
use serde_json::json;

async fn composer() -> DocumentComposer<MemoryStore> {
    DocumentComposer::new(
        user_schema(),
        seeded_store().await,
        Arc::new(TypeRegistry::new()),
    )
    .unwrap()
}

async fn find_many(composer: &DocumentComposer<MemoryStore>, args: serde_json::Value) -> Val {
    composer
        .resolve_field("findMany", &params(args))
        .await
        .unwrap()
}

fn field_names(fields: &[FieldDefinition]) -> Vec<String> {
    fields.iter().map(|f| f.name.node.to_string()).collect()
}

#[tokio::test]
async fn exposes_every_resolver_by_name() {
    let composer = composer().await;

    assert_eq!(
        composer.resolver_names(),
        vec!["findMany", "findById", "findOne", "count", "removeById"]
    );

    for name in composer.resolver_names() {
        let resolver = composer.resolver(name).unwrap();
        assert_eq!(resolver.descriptor().name, name);
    }
    assert_eq!(
        composer.resolver("removeById").unwrap().descriptor().kind,
        OperationKind::Mutation
    );
    assert!(composer.resolver("updateById").is_none());
}

#[tokio::test]
async fn root_fields_are_prefixed_with_the_model_name() {
    let composer = composer().await;

    assert_eq!(
        field_names(&composer.schema_queries()),
        vec!["userFindMany", "userFindById", "userFindOne", "userCount"]
    );

    let mutations = composer.schema_mutations();
    assert_eq!(field_names(&mutations), vec!["userRemoveById"]);
    assert_eq!(mutations[0].ty.node.to_string(), "RemoveByIdUserPayload");
}

#[tokio::test]
async fn registers_every_generated_type() {
    let composer = composer().await;

    let names: Vec<String> = composer
        .schema_types()
        .iter()
        .map(|t| t.name.node.to_string())
        .collect();

    for expected in [
        "User",
        "UserContacts",
        "FilterFindManyUserInput",
        "FilterFindManyUserContactsInput",
        "SortFindManyUserInput",
        "RemoveByIdUserPayload",
    ] {
        assert!(
            names.iter().any(|name| name == expected),
            "{expected} missing from {names:?}"
        );
    }
}

#[tokio::test]
async fn composing_twice_reuses_types() {
    let registry = Arc::new(TypeRegistry::new());
    let store = seeded_store().await;

    let first = DocumentComposer::new(user_schema(), store.clone(), registry.clone()).unwrap();
    let registered = registry.len();
    let second = DocumentComposer::new(user_schema(), store, registry.clone()).unwrap();

    assert_eq!(registry.len(), registered);
    assert!(Arc::ptr_eq(first.object_type(), second.object_type()));
    for name in ["RemoveByIdUserPayload", "FilterFindManyUserInput"] {
        let from_first = first
            .schema_types()
            .into_iter()
            .find(|t| t.name.node.as_str() == name)
            .unwrap();
        assert!(Arc::ptr_eq(&from_first, &registry.get(name).unwrap()));
    }
}

#[tokio::test]
async fn models_sharing_a_generated_name_are_rejected() {
    let registry = Arc::new(TypeRegistry::new());
    DocumentComposer::new(user_schema(), seeded_store().await, registry.clone()).unwrap();

    let contacts = ModelSchema::new(
        "UserContacts",
        vec![
            FieldSchema::new("_id", FieldType::scalar(PrimitiveType::Id)).required(),
            FieldSchema::new("phone", FieldType::scalar(PrimitiveType::String)),
        ],
    )
    .unwrap();
    let result = DocumentComposer::new(
        contacts,
        Arc::new(MemoryStore::new("contacts", "_id")),
        registry.clone(),
    );

    assert!(matches!(
        result,
        Err(SchemaError::ConflictingTypeDefinition(name)) if name == "UserContacts"
    ));
    assert_eq!(
        registry.get("UserContacts").unwrap().field_names(),
        vec!["email", "phones"]
    );
}

#[test_log::test(tokio::test)]
async fn resolves_fields_by_name() {
    let composer = composer().await;

    let users = composer
        .resolve_field("findMany", &params(json!({})))
        .await
        .unwrap();
    assert!(matches!(&users, Val::List(users) if users.len() == 2));

    let count = composer
        .resolve_field("count", &params(json!({"filter": {"gender": "male"}})))
        .await
        .unwrap();
    assert_eq!(count, Val::from(1usize));

    let missing = composer
        .resolve_field("findById", &params(json!({"_id": "u9"})))
        .await
        .unwrap();
    assert_eq!(missing, Val::Null);

    let payload = composer
        .resolve_field("removeById", &params(json!({"_id": "u2"})))
        .await
        .unwrap();
    match payload {
        Val::Object(payload) => {
            assert_eq!(payload.get("recordId"), Some(&Val::from("u2")));
            assert!(matches!(payload.get("record"), Some(Val::Object(_))));
        }
        other => panic!("Expected an object payload, got {other:?}"),
    }

    let count = composer
        .resolve_field("count", &params(json!({})))
        .await
        .unwrap();
    assert_eq!(count, Val::from(1usize));
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let composer = composer().await;

    let result = composer
        .resolve_field("updateById", &params(json!({})))
        .await;

    assert!(matches!(
        result,
        Err(ResolverError::Validation(ValidationError::OperationNotFound(name))) if name == "updateById"
    ));
}

#[tokio::test]
async fn store_configuration_comes_from_the_environment() {
    let env = MapEnvironment::from([(DOC_STORE_DEFAULT_LIMIT, "1")]);
    let config = MemoryStoreConfig::from_env(&env).unwrap();
    let store = MemoryStore::with_config("users", "_id", config);
    seed(&store).await;

    let composer = DocumentComposer::new(
        user_schema(),
        Arc::new(store),
        Arc::new(TypeRegistry::new()),
    )
    .unwrap();

    let limited = find_many(&composer, json!({})).await;
    assert!(matches!(&limited, Val::List(users) if users.len() == 1));

    let explicit = find_many(&composer, json!({"limit": 2})).await;
    assert!(matches!(&explicit, Val::List(users) if users.len() == 2));
}
