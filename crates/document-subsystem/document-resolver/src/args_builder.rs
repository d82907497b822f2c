// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Argument surface derived from a model schema.
//!
//! [`ArgumentSchema`] is the single source of truth for the filter and sort keys a model accepts:
//! it registers the corresponding GraphQL input types and validates incoming argument values
//! against the same field list.

use std::sync::Arc;

use async_graphql_parser::types::{InputValueDefinition, Type, TypeDefinition};
use common::value::Val;
use core_model::{
    naming::{filter_type_name, nested_object_type_name, sort_type_name},
    primitive_type::PrimitiveType,
    schema::{FieldSchema, FieldType, ModelSchema, SchemaError},
    type_normalization::{
        input_object_type_definition, input_value_definition, list_type, named_type,
    },
    type_registry::TypeRegistry,
};
use core_resolver::ValidationError;
use doc_store::{Filter, FindQuery, Projection, SortDirection, SortSpec};
use indexmap::IndexMap;

pub const FILTER_PARAM_NAME: &str = "filter";
pub const FILTER_PARAM_DESCRIPTION: &str = "Only documents whose fields equal the given values";
pub const SORT_PARAM_NAME: &str = "sort";
pub const SORT_PARAM_DESCRIPTION: &str =
    "Sort keys in priority order: 1 for ascending, -1 for descending";
pub const LIMIT_PARAM_NAME: &str = "limit";
pub const LIMIT_PARAM_DESCRIPTION: &str = "Maximum number of results to return";
pub const SKIP_PARAM_NAME: &str = "skip";
pub const SKIP_PARAM_DESCRIPTION: &str = "Number of results to skip";

#[derive(Debug, Clone)]
pub struct ArgumentSchema {
    type_name: String,
    id_field: FieldSchema,
    fields: Vec<FieldSchema>,
    filter_type: Arc<TypeDefinition>,
    sort_type: Arc<TypeDefinition>,
}

impl ArgumentSchema {
    /// Fails if a generated input type name is already registered with a different shape.
    pub fn new(schema: &ModelSchema, registry: &TypeRegistry) -> Result<Self, SchemaError> {
        let type_name = schema.name().to_string();

        let filter_type = register_filter_type(&type_name, schema.fields(), registry)?;
        let sort_fields = schema
            .fields()
            .iter()
            .filter(|field| is_sortable(field))
            .map(|field| {
                input_value_definition(
                    &field.name,
                    named_type(PrimitiveType::Int.name(), true),
                    None,
                )
            })
            .collect();
        let sort_type = registry.register(input_object_type_definition(
            &sort_type_name(&type_name),
            None,
            sort_fields,
        ))?;

        // The identifier is always a declared field
        let id_field = schema
            .field(schema.id_field())
            .cloned()
            .unwrap_or_else(|| {
                FieldSchema::new(schema.id_field(), FieldType::Scalar(PrimitiveType::Id))
            });

        Ok(Self {
            type_name,
            id_field,
            fields: schema.fields().to_vec(),
            filter_type,
            sort_type,
        })
    }

    pub fn filter_type(&self) -> &Arc<TypeDefinition> {
        &self.filter_type
    }

    pub fn sort_type(&self) -> &Arc<TypeDefinition> {
        &self.sort_type
    }

    pub fn id_field(&self) -> &str {
        &self.id_field.name
    }

    pub fn filter_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn sort_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|field| is_sortable(field))
            .map(|field| field.name.as_str())
    }

    pub fn filter_arg(&self) -> InputValueDefinition {
        input_value_definition(
            FILTER_PARAM_NAME,
            named_type(&filter_type_name(&self.type_name), true),
            Some(FILTER_PARAM_DESCRIPTION),
        )
    }

    pub fn sort_arg(&self) -> InputValueDefinition {
        input_value_definition(
            SORT_PARAM_NAME,
            named_type(&sort_type_name(&self.type_name), true),
            Some(SORT_PARAM_DESCRIPTION),
        )
    }

    pub fn limit_arg(&self) -> InputValueDefinition {
        input_value_definition(
            LIMIT_PARAM_NAME,
            named_type(PrimitiveType::Int.name(), true),
            Some(LIMIT_PARAM_DESCRIPTION),
        )
    }

    pub fn skip_arg(&self) -> InputValueDefinition {
        input_value_definition(
            SKIP_PARAM_NAME,
            named_type(PrimitiveType::Int.name(), true),
            Some(SKIP_PARAM_DESCRIPTION),
        )
    }

    /// The primitive type of the identifier field (`ID` unless declared otherwise)
    pub fn id_type(&self) -> PrimitiveType {
        self.id_field
            .typ
            .innermost_primitive()
            .unwrap_or(PrimitiveType::Id)
    }

    /// The required identifier argument, named and typed after the identifier field
    pub fn id_arg(&self) -> InputValueDefinition {
        input_value_definition(
            &self.id_field.name,
            named_type(self.id_type().name(), false),
            None,
        )
    }

    /// The identifier argument's value; absent and `null` are both rejected.
    pub fn parse_id(&self, argument: Option<&Val>) -> Result<Val, ValidationError> {
        let id = match argument {
            None | Some(Val::Null) => {
                return Err(ValidationError::RequiredArgumentNotFound(
                    self.id_field.name.clone(),
                ));
            }
            Some(id) => id,
        };

        check_value(&self.id_field.name, &self.type_name, &self.id_field.typ, id)?;
        Ok(id.clone())
    }

    /// Map the `filter` argument to a store filter. Absent means "match everything".
    pub fn parse_filter(&self, argument: Option<&Val>) -> Result<Filter, ValidationError> {
        match argument {
            None | Some(Val::Null) => Ok(Filter::new()),
            Some(Val::Object(constraints)) => {
                check_object(FILTER_PARAM_NAME, &self.type_name, &self.fields, constraints)?;
                Ok(Filter::from(constraints.clone()))
            }
            Some(other) => Err(ValidationError::InvalidArgumentType {
                argument_name: FILTER_PARAM_NAME.to_string(),
                expected_type: filter_type_name(&self.type_name),
                actual_type: other.kind_name().to_string(),
            }),
        }
    }

    /// Map the `sort` argument to a store sort. Keys are applied in the order given; a list of
    /// single-key objects is also accepted.
    pub fn parse_sort(&self, argument: Option<&Val>) -> Result<Option<SortSpec>, ValidationError> {
        let mut keys = vec![];

        match argument {
            None | Some(Val::Null) => return Ok(None),
            Some(Val::Object(elems)) => self.sort_pairs(elems, &mut keys)?,
            Some(Val::List(elems)) => {
                for elem in elems {
                    match elem {
                        Val::Object(elems) => self.sort_pairs(elems, &mut keys)?,
                        other => return Err(self.invalid_sort(other)),
                    }
                }
            }
            Some(other) => return Err(self.invalid_sort(other)),
        }

        Ok((!keys.is_empty()).then_some(SortSpec(keys)))
    }

    /// A store query from whichever of `filter`, `sort`, `skip` and `limit` are present.
    pub fn collection_query(
        &self,
        args: &IndexMap<String, Val>,
        projection: Projection,
    ) -> Result<FindQuery, ValidationError> {
        let filter = self.parse_filter(args.get(FILTER_PARAM_NAME))?;
        let sort = self.parse_sort(args.get(SORT_PARAM_NAME))?;
        let skip = parse_skip(args.get(SKIP_PARAM_NAME))?;
        let limit = parse_limit(args.get(LIMIT_PARAM_NAME))?;

        let mut query = FindQuery::new(filter).projection(projection);
        if let Some(sort) = sort {
            query = query.sort(sort);
        }
        if let Some(skip) = skip {
            query = query.skip(skip);
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        Ok(query)
    }

    fn sort_pairs(
        &self,
        elems: &IndexMap<String, Val>,
        keys: &mut Vec<(String, SortDirection)>,
    ) -> Result<(), ValidationError> {
        for (field, value) in elems {
            if !self.sort_keys().any(|key| key == field) {
                return Err(ValidationError::UnknownField {
                    field: field.clone(),
                    type_name: sort_type_name(&self.type_name),
                });
            }
            keys.push((field.clone(), sort_direction(field, value)?));
        }
        Ok(())
    }

    fn invalid_sort(&self, value: &Val) -> ValidationError {
        ValidationError::InvalidArgumentType {
            argument_name: SORT_PARAM_NAME.to_string(),
            expected_type: sort_type_name(&self.type_name),
            actual_type: value.kind_name().to_string(),
        }
    }
}

pub fn parse_limit(argument: Option<&Val>) -> Result<Option<usize>, ValidationError> {
    parse_non_negative(LIMIT_PARAM_NAME, argument)
}

pub fn parse_skip(argument: Option<&Val>) -> Result<Option<usize>, ValidationError> {
    parse_non_negative(SKIP_PARAM_NAME, argument)
}

fn parse_non_negative(
    name: &str,
    argument: Option<&Val>,
) -> Result<Option<usize>, ValidationError> {
    match argument {
        None | Some(Val::Null) => Ok(None),
        // Same coercion as `Int` filter values: integral floats such as `2.0` are accepted
        Some(Val::Number(number)) => match number.as_integral() {
            Some(value) if value >= 0 => Ok(Some(usize::try_from(value).unwrap_or(usize::MAX))),
            Some(value) => Err(ValidationError::NegativeValue {
                argument_name: name.to_string(),
                value: i64::try_from(value).unwrap_or(i64::MIN),
            }),
            None => Err(ValidationError::InvalidArgumentType {
                argument_name: name.to_string(),
                expected_type: PrimitiveType::Int.name().to_string(),
                actual_type: Val::Number(*number).kind_name().to_string(),
            }),
        },
        Some(other) => Err(ValidationError::InvalidArgumentType {
            argument_name: name.to_string(),
            expected_type: PrimitiveType::Int.name().to_string(),
            actual_type: other.kind_name().to_string(),
        }),
    }
}

fn sort_direction(field: &str, value: &Val) -> Result<SortDirection, ValidationError> {
    let direction = match value {
        Val::Number(number) => match number.as_i64() {
            Some(1) => Some(SortDirection::Asc),
            Some(-1) => Some(SortDirection::Desc),
            _ => None,
        },
        Val::Enum(name) | Val::String(name) => match name.as_str() {
            "ASC" => Some(SortDirection::Asc),
            "DESC" => Some(SortDirection::Desc),
            _ => None,
        },
        _ => None,
    };

    direction.ok_or_else(|| ValidationError::InvalidSortDirection {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn is_sortable(field: &FieldSchema) -> bool {
    matches!(field.typ, FieldType::Scalar(typ) if typ.is_sortable())
}

fn register_filter_type(
    type_name: &str,
    fields: &[FieldSchema],
    registry: &TypeRegistry,
) -> Result<Arc<TypeDefinition>, SchemaError> {
    // Nested input types are registered first so that their shapes are checked too
    let input_fields = fields
        .iter()
        .map(|field| {
            let ty = filter_field_type(type_name, field, &field.typ, true, registry)?;
            Ok(input_value_definition(
                &field.name,
                ty,
                field.description.as_deref(),
            ))
        })
        .collect::<Result<Vec<InputValueDefinition>, SchemaError>>()?;

    registry.register(input_object_type_definition(
        &filter_type_name(type_name),
        None,
        input_fields,
    ))
}

fn filter_field_type(
    type_name: &str,
    field: &FieldSchema,
    typ: &FieldType,
    nullable: bool,
    registry: &TypeRegistry,
) -> Result<Type, SchemaError> {
    Ok(match typ {
        FieldType::Scalar(primitive) => named_type(primitive.name(), nullable),
        FieldType::List(inner) => list_type(
            filter_field_type(type_name, field, inner, false, registry)?,
            nullable,
        ),
        FieldType::Object(object) => {
            let nested_name = nested_object_type_name(type_name, &field.name);
            let nested = register_filter_type(&nested_name, &object.fields, registry)?;
            named_type(nested.name.node.as_str(), nullable)
        }
    })
}

/// `type_name` is the generated name for the object holding `fields` (`User`, `UserContacts`);
/// errors name its filter input type.
fn check_object(
    path: &str,
    type_name: &str,
    fields: &[FieldSchema],
    constraints: &IndexMap<String, Val>,
) -> Result<(), ValidationError> {
    for (key, value) in constraints {
        let field = fields
            .iter()
            .find(|field| &field.name == key)
            .ok_or_else(|| ValidationError::UnknownField {
                field: key.clone(),
                type_name: filter_type_name(type_name),
            })?;

        check_value(
            &format!("{path}.{key}"),
            &nested_object_type_name(type_name, key),
            &field.typ,
            value,
        )?;
    }
    Ok(())
}

// `null` is accepted everywhere (it matches missing fields). A list field accepts a whole list or
// a single element (membership). `nested_type` is the generated name an object value would have.
fn check_value(
    path: &str,
    nested_type: &str,
    typ: &FieldType,
    value: &Val,
) -> Result<(), ValidationError> {
    match (typ, value) {
        (_, Val::Null) => Ok(()),
        (FieldType::Scalar(primitive), value) => {
            if primitive.accepts(value) {
                Ok(())
            } else {
                Err(invalid_type(path, primitive.name(), value))
            }
        }
        (FieldType::List(inner), Val::List(items)) => items
            .iter()
            .try_for_each(|item| check_value(path, nested_type, inner, item)),
        (FieldType::List(inner), value) => check_value(path, nested_type, inner, value),
        (FieldType::Object(object), Val::Object(constraints)) => {
            check_object(path, nested_type, &object.fields, constraints)
        }
        (FieldType::Object(_), value) => Err(invalid_type(path, "Object", value)),
    }
}

fn invalid_type(path: &str, expected: &str, value: &Val) -> ValidationError {
    ValidationError::InvalidArgumentType {
        argument_name: path.to_string(),
        expected_type: expected.to_string(),
        actual_type: value.kind_name().to_string(),
    }
}
