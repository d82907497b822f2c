// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The static description of a document model.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{naming::nested_object_type_name, primitive_type::PrimitiveType};

pub const DEFAULT_ID_FIELD: &str = "_id";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("'{0}' is not a valid type name")]
    InvalidTypeName(String),

    #[error("'{field}' is not a valid field name in type '{type_name}'")]
    InvalidFieldName { type_name: String, field: String },

    #[error("Field '{field}' is declared more than once in type '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    #[error("Identifier field '{id_field}' is not declared in type '{type_name}'")]
    MissingIdField { type_name: String, id_field: String },

    #[error("Identifier field '{id_field}' of type '{type_name}' must be a scalar")]
    NonScalarIdField { type_name: String, id_field: String },

    #[error(
        "Fields '{first}' and '{second}' of type '{type_name}' would both generate type '{nested_type}'"
    )]
    NestedTypeNameClash {
        type_name: String,
        first: String,
        second: String,
        nested_type: String,
    },

    #[error("Type '{0}' is already registered with a different shape")]
    ConflictingTypeDefinition(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    name: String,
    id_field: String,
    fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub typ: FieldType,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    Scalar(PrimitiveType),
    List(Box<FieldType>),
    Object(ObjectSchema),
}

/// A nested object. Its GraphQL name is derived from the enclosing type and the field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    pub fields: Vec<FieldSchema>,
}

impl ModelSchema {
    /// A schema whose documents are identified by [`DEFAULT_ID_FIELD`].
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Result<Self, SchemaError> {
        Self::with_id_field(name, DEFAULT_ID_FIELD, fields)
    }

    pub fn with_id_field(
        name: impl Into<String>,
        id_field: impl Into<String>,
        fields: Vec<FieldSchema>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let id_field = id_field.into();

        if !is_valid_name(&name) {
            return Err(SchemaError::InvalidTypeName(name));
        }
        check_fields(&name, &name, &fields)?;

        match fields.iter().find(|field| field.name == id_field) {
            None => {
                return Err(SchemaError::MissingIdField {
                    type_name: name,
                    id_field,
                });
            }
            Some(field) if !matches!(field.typ, FieldType::Scalar(_)) => {
                return Err(SchemaError::NonScalarIdField {
                    type_name: name,
                    id_field,
                });
            }
            Some(_) => {}
        }

        Ok(Self {
            name,
            id_field,
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl FieldSchema {
    /// An optional field without a description
    pub fn new(name: impl Into<String>, typ: FieldType) -> Self {
        Self {
            name: name.into(),
            typ,
            required: false,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl FieldType {
    pub fn scalar(typ: PrimitiveType) -> Self {
        FieldType::Scalar(typ)
    }

    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    pub fn object(fields: Vec<FieldSchema>) -> Self {
        FieldType::Object(ObjectSchema { fields })
    }

    /// The primitive type of a scalar or a (possibly nested) list of scalars
    pub fn innermost_primitive(&self) -> Option<PrimitiveType> {
        match self {
            FieldType::Scalar(typ) => Some(*typ),
            FieldType::List(inner) => inner.innermost_primitive(),
            FieldType::Object(_) => None,
        }
    }
}

/// `path` locates the fields in error messages (`User.contacts`); `graphql_name` is the name of
/// the generated type holding them (`UserContacts`).
fn check_fields(
    path: &str,
    graphql_name: &str,
    fields: &[FieldSchema],
) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    let mut nested_types: HashMap<String, &str> = HashMap::new();

    for field in fields {
        if !is_valid_name(&field.name) {
            return Err(SchemaError::InvalidFieldName {
                type_name: path.to_string(),
                field: field.name.clone(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                type_name: path.to_string(),
                field: field.name.clone(),
            });
        }

        let mut typ = &field.typ;
        while let FieldType::List(inner) = typ {
            typ = inner;
        }
        if let FieldType::Object(object) = typ {
            let nested_type = nested_object_type_name(graphql_name, &field.name);
            if let Some(first) = nested_types.get(&nested_type) {
                return Err(SchemaError::NestedTypeNameClash {
                    type_name: path.to_string(),
                    first: first.to_string(),
                    second: field.name.clone(),
                    nested_type,
                });
            }

            check_fields(
                &format!("{path}.{}", field.name),
                &nested_type,
                &object.fields,
            )?;
            nested_types.insert(nested_type, &field.name);
        }
    }

    Ok(())
}

/// GraphQL names: `/[_A-Za-z][_0-9A-Za-z]*/`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}
