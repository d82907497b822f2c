// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::{
    Pos, Positioned,
    types::{
        BaseType, FieldDefinition, InputObjectType, InputValueDefinition, ObjectType, Type,
        TypeDefinition, TypeKind,
    },
};
use async_graphql_value::Name;

pub trait FieldDefinitionProvider {
    fn field_definition(&self) -> FieldDefinition;
}

pub fn default_positioned<T>(value: T) -> Positioned<T> {
    Positioned::new(value, Pos::default())
}

pub fn default_positioned_name(value: &str) -> Positioned<Name> {
    default_positioned(Name::new(value))
}

/// A named type such as `User` (nullable) or `Int!`
pub fn named_type(name: &str, nullable: bool) -> Type {
    Type {
        base: BaseType::Named(Name::new(name)),
        nullable,
    }
}

/// A list type such as `[User!]!`
pub fn list_type(inner: Type, nullable: bool) -> Type {
    Type {
        base: BaseType::List(Box::new(inner)),
        nullable,
    }
}

pub fn innermost_type_name(typ: &Type) -> &str {
    match &typ.base {
        BaseType::Named(name) => name.as_str(),
        BaseType::List(inner) => innermost_type_name(inner),
    }
}

pub fn input_value_definition(
    name: &str,
    ty: Type,
    description: Option<&str>,
) -> InputValueDefinition {
    InputValueDefinition {
        description: description.map(|d| default_positioned(d.to_string())),
        name: default_positioned_name(name),
        ty: default_positioned(ty),
        default_value: None,
        directives: vec![],
    }
}

pub fn field_definition(
    name: &str,
    arguments: Vec<InputValueDefinition>,
    ty: Type,
    description: Option<&str>,
) -> FieldDefinition {
    FieldDefinition {
        description: description.map(|d| default_positioned(d.to_string())),
        name: default_positioned_name(name),
        arguments: arguments.into_iter().map(default_positioned).collect(),
        ty: default_positioned(ty),
        directives: vec![],
    }
}

pub fn object_type_definition(
    name: &str,
    description: Option<&str>,
    fields: Vec<FieldDefinition>,
) -> TypeDefinition {
    TypeDefinition {
        extend: false,
        description: description.map(|d| default_positioned(d.to_string())),
        name: default_positioned_name(name),
        directives: vec![],
        kind: TypeKind::Object(ObjectType {
            implements: vec![],
            fields: fields.into_iter().map(default_positioned).collect(),
        }),
    }
}

pub fn input_object_type_definition(
    name: &str,
    description: Option<&str>,
    fields: Vec<InputValueDefinition>,
) -> TypeDefinition {
    TypeDefinition {
        extend: false,
        description: description.map(|d| default_positioned(d.to_string())),
        name: default_positioned_name(name),
        directives: vec![],
        kind: TypeKind::InputObject(InputObjectType {
            fields: fields.into_iter().map(default_positioned).collect(),
        }),
    }
}

/// Uniform read access to the variants of `TypeDefinition` we generate
pub trait TypeDefinitionIntrospection {
    fn name(&self) -> &str;
    fn kind(&self) -> &'static str;
    fn fields(&self) -> Option<&Vec<Positioned<FieldDefinition>>>;
    fn input_fields(&self) -> Option<&Vec<Positioned<InputValueDefinition>>>;

    /// Names of the fields (for object types) or input fields (for input types)
    fn field_names(&self) -> Vec<&str> {
        match (self.fields(), self.input_fields()) {
            (Some(fields), _) => fields.iter().map(|f| f.node.name.node.as_str()).collect(),
            (_, Some(fields)) => fields.iter().map(|f| f.node.name.node.as_str()).collect(),
            _ => vec![],
        }
    }

    /// The type of the named field or input field, rendered as in SDL (`[String!]`)
    fn field_type(&self, field: &str) -> Option<String> {
        if let Some(fields) = self.fields() {
            return fields
                .iter()
                .find(|f| f.node.name.node.as_str() == field)
                .map(|f| f.node.ty.node.to_string());
        }
        self.input_fields().and_then(|fields| {
            fields
                .iter()
                .find(|f| f.node.name.node.as_str() == field)
                .map(|f| f.node.ty.node.to_string())
        })
    }

    /// Kind and fields in SDL form, such as `OBJECT {_id: ID!, name: String}`. Two definitions
    /// with the same signature describe the same shape.
    fn signature(&self) -> String {
        let fields: Vec<String> = self
            .field_names()
            .into_iter()
            .map(|name| format!("{name}: {}", self.field_type(name).unwrap_or_default()))
            .collect();
        format!("{} {{{}}}", self.kind(), fields.join(", "))
    }
}

impl TypeDefinitionIntrospection for TypeDefinition {
    fn name(&self) -> &str {
        self.name.node.as_str()
    }

    fn kind(&self) -> &'static str {
        match self.kind {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object(_) => "OBJECT",
            TypeKind::Interface(_) => "INTERFACE",
            TypeKind::Union(_) => "UNION",
            TypeKind::Enum(_) => "ENUM",
            TypeKind::InputObject(_) => "INPUT_OBJECT",
        }
    }

    fn fields(&self) -> Option<&Vec<Positioned<FieldDefinition>>> {
        match &self.kind {
            TypeKind::Object(value) => Some(&value.fields),
            _ => None,
        }
    }

    fn input_fields(&self) -> Option<&Vec<Positioned<InputValueDefinition>>> {
        match &self.kind {
            TypeKind::InputObject(value) => Some(&value.fields),
            _ => None,
        }
    }
}
