// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use common::value::Val;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// An opaque document identifier (string or number)
    Id,
    String,
    Int,
    Float,
    Boolean,
    /// Any value, including objects and lists
    Json,
}

impl PrimitiveType {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Id => "ID",
            PrimitiveType::String => "String",
            PrimitiveType::Int => "Int",
            PrimitiveType::Float => "Float",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Json => "JSON",
        }
    }

    /// Can a value of this type be used in equality filters and sorting?
    pub fn is_sortable(&self) -> bool {
        !matches!(self, PrimitiveType::Json)
    }

    /// Does `value` have the shape of this type? `Null` is handled by the caller.
    pub fn accepts(&self, value: &Val) -> bool {
        match (self, value) {
            (PrimitiveType::Json, _) => true,
            (PrimitiveType::Id, Val::String(_) | Val::Number(_)) => true,
            (PrimitiveType::String, Val::String(_) | Val::Enum(_)) => true,
            (PrimitiveType::Int, Val::Number(number)) => number.as_integral().is_some(),
            (PrimitiveType::Float, Val::Number(_)) => true,
            (PrimitiveType::Boolean, Val::Bool(_)) => true,
            _ => false,
        }
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
