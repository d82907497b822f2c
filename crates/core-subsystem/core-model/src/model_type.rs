// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! GraphQL output types mirroring a model schema.

use std::sync::Arc;

use async_graphql_parser::types::{FieldDefinition, Type, TypeDefinition};

use crate::{
    naming::nested_object_type_name,
    schema::{FieldSchema, FieldType, ModelSchema, SchemaError},
    type_normalization::{field_definition, list_type, named_type, object_type_definition},
    type_registry::TypeRegistry,
};

/// Register the object type `<Type>` (and `<Type><Object>` for each nested object).
///
/// Required fields are non-null; list elements are always non-null. Fails if a generated name is
/// already registered with a different shape.
pub fn register_model_type(
    schema: &ModelSchema,
    registry: &TypeRegistry,
) -> Result<Arc<TypeDefinition>, SchemaError> {
    register_object_type(schema.name(), schema.fields(), registry)
}

fn register_object_type(
    type_name: &str,
    fields: &[FieldSchema],
    registry: &TypeRegistry,
) -> Result<Arc<TypeDefinition>, SchemaError> {
    // Nested types are registered first so that their shapes are checked too
    let field_definitions = fields
        .iter()
        .map(|field| {
            let ty = output_type(type_name, field, &field.typ, !field.required, registry)?;
            Ok(field_definition(
                &field.name,
                vec![],
                ty,
                field.description.as_deref(),
            ))
        })
        .collect::<Result<Vec<FieldDefinition>, SchemaError>>()?;

    registry.register(object_type_definition(type_name, None, field_definitions))
}

fn output_type(
    parent_type: &str,
    field: &FieldSchema,
    typ: &FieldType,
    nullable: bool,
    registry: &TypeRegistry,
) -> Result<Type, SchemaError> {
    Ok(match typ {
        FieldType::Scalar(primitive) => named_type(primitive.name(), nullable),
        FieldType::List(inner) => list_type(
            output_type(parent_type, field, inner, false, registry)?,
            nullable,
        ),
        FieldType::Object(object) => {
            let nested_name = nested_object_type_name(parent_type, &field.name);
            register_object_type(&nested_name, &object.fields, registry)?;
            named_type(&nested_name, nullable)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{primitive_type::PrimitiveType, type_normalization::TypeDefinitionIntrospection};
    use multiplatform_test::multiplatform_test;

    fn user_schema() -> ModelSchema {
        ModelSchema::new(
            "User",
            vec![
                FieldSchema::new("_id", FieldType::scalar(PrimitiveType::Id)).required(),
                FieldSchema::new("name", FieldType::scalar(PrimitiveType::String))
                    .required()
                    .with_description("Full name"),
                FieldSchema::new(
                    "skills",
                    FieldType::list(FieldType::scalar(PrimitiveType::String)),
                ),
                FieldSchema::new(
                    "contacts",
                    FieldType::object(vec![FieldSchema::new(
                        "email",
                        FieldType::scalar(PrimitiveType::String),
                    )]),
                ),
            ],
        )
        .unwrap()
    }

    #[multiplatform_test]
    fn mirrors_schema_fields() {
        let registry = TypeRegistry::new();
        let user = register_model_type(&user_schema(), &registry).unwrap();

        assert_eq!(user.name(), "User");
        assert_eq!(user.field_names(), vec!["_id", "name", "skills", "contacts"]);
        assert_eq!(user.field_type("_id").as_deref(), Some("ID!"));
        assert_eq!(user.field_type("name").as_deref(), Some("String!"));
        assert_eq!(user.field_type("skills").as_deref(), Some("[String!]"));
        assert_eq!(user.field_type("contacts").as_deref(), Some("UserContacts"));

        let contacts = registry.get("UserContacts").unwrap();
        assert_eq!(contacts.field_type("email").as_deref(), Some("String"));
    }

    #[multiplatform_test]
    fn registered_once() {
        let registry = TypeRegistry::new();
        let first = register_model_type(&user_schema(), &registry).unwrap();
        let second = register_model_type(&user_schema(), &registry).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 2);
    }

    #[multiplatform_test]
    fn model_named_like_a_nested_type_is_rejected() {
        let registry = TypeRegistry::new();
        register_model_type(&user_schema(), &registry).unwrap();

        let contacts = ModelSchema::new(
            "UserContacts",
            vec![
                FieldSchema::new("_id", FieldType::scalar(PrimitiveType::Id)).required(),
                FieldSchema::new("phone", FieldType::scalar(PrimitiveType::String)),
            ],
        )
        .unwrap();

        assert_eq!(
            register_model_type(&contacts, &registry).unwrap_err(),
            SchemaError::ConflictingTypeDefinition("UserContacts".to_string())
        );
        assert_eq!(
            registry.get("UserContacts").unwrap().field_names(),
            vec!["email"]
        );

        // The other way around fails the same way
        let registry = TypeRegistry::new();
        register_model_type(&contacts, &registry).unwrap();
        assert_eq!(
            register_model_type(&user_schema(), &registry).unwrap_err(),
            SchemaError::ConflictingTypeDefinition("UserContacts".to_string())
        );
        assert!(registry.get("User").is_none());
    }
}
