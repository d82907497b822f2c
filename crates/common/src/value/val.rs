// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{cmp::Ordering, fmt::Display};

use async_graphql_value::ConstValue;
use indexmap::IndexMap;
use serde::de::Error;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub enum ValNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl ValNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            ValNumber::I64(n) => *n as f64,
            ValNumber::U64(n) => *n as f64,
            ValNumber::F64(n) => *n,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ValNumber::I64(n) => Some(*n),
            ValNumber::U64(n) => i64::try_from(*n).ok(),
            ValNumber::F64(_) => None,
        }
    }

    /// The value as an unsigned integer, if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ValNumber::I64(n) => u64::try_from(*n).ok(),
            ValNumber::U64(n) => Some(*n),
            ValNumber::F64(_) => None,
        }
    }

    /// The value as an integer if it has no fractional part, so `3.0` counts and `3.5` does not.
    pub fn as_integral(&self) -> Option<i128> {
        match self {
            ValNumber::F64(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i128),
            _ => self.as_i128(),
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            ValNumber::I64(n) => Some(*n as i128),
            ValNumber::U64(n) => Some(*n as i128),
            ValNumber::F64(_) => None,
        }
    }
}

impl Display for ValNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValNumber::I64(n) => write!(f, "{n}"),
            ValNumber::U64(n) => write!(f, "{n}"),
            ValNumber::F64(n) => write!(f, "{n}"),
        }
    }
}

impl TryFrom<serde_json::Number> for ValNumber {
    type Error = ();

    fn try_from(value: serde_json::Number) -> Result<Self, Self::Error> {
        if let Some(n) = value.as_i64() {
            Ok(ValNumber::I64(n))
        } else if let Some(n) = value.as_u64() {
            Ok(ValNumber::U64(n))
        } else if let Some(n) = value.as_f64() {
            Ok(ValNumber::F64(n))
        } else {
            Err(())
        }
    }
}

impl From<i32> for ValNumber {
    fn from(value: i32) -> Self {
        ValNumber::I64(value as i64)
    }
}

impl From<i64> for ValNumber {
    fn from(value: i64) -> Self {
        ValNumber::I64(value)
    }
}

impl From<u64> for ValNumber {
    fn from(value: u64) -> Self {
        ValNumber::U64(value)
    }
}

impl From<f64> for ValNumber {
    fn from(value: f64) -> Self {
        ValNumber::F64(value)
    }
}

/// Numbers compare by value regardless of representation, so `I64(1)`, `U64(1)` and `F64(1.0)`
/// are equal.
impl PartialOrd for ValNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.as_i128(), other.as_i128()) {
            (Some(left), Some(right)) => Some(left.cmp(&right)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl PartialEq for ValNumber {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

/// Represent a value that can be used in:
/// - arguments
/// - document fields
/// - resolver results
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Val {
    Bool(bool),
    Number(ValNumber),
    String(String),
    List(Vec<Val>),
    Object(IndexMap<String, Val>),
    Binary(bytes::Bytes),
    Enum(String),
    Null,
}

pub const TRUE: Val = Val::Bool(true);
pub const FALSE: Val = Val::Bool(false);

impl Val {
    pub fn get(&self, key: &str) -> Option<&Val> {
        match self {
            Val::Object(o) => o.get(key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Val::Null)
    }

    /// Name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Val::Bool(_) => "Boolean",
            Val::Number(ValNumber::F64(_)) => "Float",
            Val::Number(_) => "Int",
            Val::String(_) => "String",
            Val::List(_) => "List",
            Val::Object(_) => "Object",
            Val::Binary(_) => "Binary",
            Val::Enum(_) => "Enum",
            Val::Null => "Null",
        }
    }

    // Values of different kinds order by kind first: null < numbers < strings < objects < lists
    // < binary < booleans
    fn kind_rank(&self) -> u8 {
        match self {
            Val::Null => 0,
            Val::Number(_) => 1,
            Val::String(_) | Val::Enum(_) => 2,
            Val::Object(_) => 3,
            Val::List(_) => 4,
            Val::Binary(_) => 5,
            Val::Bool(_) => 6,
        }
    }

    /// Total order over values, used to sort documents.
    pub fn total_cmp(&self, other: &Val) -> Ordering {
        match (self, other) {
            (Val::Null, Val::Null) => Ordering::Equal,
            (Val::Number(left), Val::Number(right)) => left
                .partial_cmp(right)
                .unwrap_or_else(|| left.as_f64().total_cmp(&right.as_f64())),
            (
                Val::String(left) | Val::Enum(left),
                Val::String(right) | Val::Enum(right),
            ) => left.cmp(right),
            (Val::Object(left), Val::Object(right)) => left
                .iter()
                .zip(right.iter())
                .map(|((lk, lv), (rk, rv))| lk.cmp(rk).then_with(|| lv.total_cmp(rv)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| left.len().cmp(&right.len())),
            (Val::List(left), Val::List(right)) => left
                .iter()
                .zip(right.iter())
                .map(|(l, r)| l.total_cmp(r))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| left.len().cmp(&right.len())),
            (Val::Binary(left), Val::Binary(right)) => left.cmp(right),
            (Val::Bool(left), Val::Bool(right)) => left.cmp(right),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Val::Bool(b) => write!(f, "{b}"),
            Val::Number(n) => write!(f, "{n}"),
            Val::String(s) => write!(f, "\"{s}\""),
            Val::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Val::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Val::Binary(_) => write!(f, "Binary"),
            Val::Enum(e) => write!(f, "{e}"),
            Val::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for Val {
    fn from(value: &str) -> Self {
        Val::String(value.to_string())
    }
}

impl From<String> for Val {
    fn from(value: String) -> Self {
        Val::String(value)
    }
}

impl From<bool> for Val {
    fn from(value: bool) -> Self {
        Val::Bool(value)
    }
}

impl From<i64> for Val {
    fn from(value: i64) -> Self {
        Val::Number(value.into())
    }
}

impl From<usize> for Val {
    fn from(value: usize) -> Self {
        Val::Number((value as u64).into())
    }
}

impl From<f64> for Val {
    fn from(value: f64) -> Self {
        Val::Number(value.into())
    }
}

impl<T: Into<Val>> From<Vec<T>> for Val {
    fn from(value: Vec<T>) -> Self {
        Val::List(value.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<ConstValue> for Val {
    type Error = serde_json::Error;

    fn try_from(value: ConstValue) -> Result<Self, Self::Error> {
        match value {
            ConstValue::Null => Ok(Val::Null),
            ConstValue::Boolean(b) => Ok(Val::Bool(b)),
            ConstValue::Number(n) => {
                Ok(Val::Number(n.try_into().map_err(|_| {
                    serde_json::Error::custom("Invalid number")
                })?))
            }
            ConstValue::String(s) => Ok(Val::String(s)),
            ConstValue::List(l) => Ok(Val::List(
                l.into_iter()
                    .map(|v| v.try_into())
                    .collect::<Result<_, _>>()?,
            )),
            ConstValue::Object(o) => Ok(Val::Object(
                o.into_iter()
                    .map(|(k, v)| Ok((k.to_string(), v.try_into()?)))
                    .collect::<Result<_, _>>()?,
            )),
            ConstValue::Binary(b) => Ok(Val::Binary(b)),
            ConstValue::Enum(e) => Ok(Val::Enum(e.to_string())),
        }
    }
}

impl From<serde_json::Value> for Val {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Val::Null,
            serde_json::Value::Bool(b) => Val::Bool(b),
            serde_json::Value::Number(n) => n.try_into().map(Val::Number).unwrap_or(Val::Null),
            serde_json::Value::String(s) => Val::String(s),
            serde_json::Value::Array(l) => Val::List(l.into_iter().map(|v| v.into()).collect()),
            serde_json::Value::Object(o) => {
                Val::Object(o.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn integral_numbers() {
        assert_eq!(ValNumber::from(3i64).as_integral(), Some(3));
        assert_eq!(ValNumber::from(u64::MAX).as_integral(), Some(u64::MAX as i128));
        assert_eq!(ValNumber::from(-2.0).as_integral(), Some(-2));
        assert_eq!(ValNumber::from(2.5).as_integral(), None);
        assert_eq!(ValNumber::from(f64::NAN).as_integral(), None);
    }

    #[multiplatform_test]
    fn test_number_eq() {
        let one_u64: ValNumber = ValNumber::from(1u64);
        let one_i64: ValNumber = ValNumber::from(1i64);
        let one_f64: ValNumber = ValNumber::from(1.0);

        let ones = vec![one_u64, one_i64, one_f64];

        for left in &ones {
            for right in &ones {
                assert_eq!(left, right);
            }
        }
    }

    #[multiplatform_test]
    fn test_number_lt() {
        let min_i64 = ValNumber::from(i64::MIN);
        let min_f64 = ValNumber::from(f64::MIN);

        let max_u64 = ValNumber::from(u64::MAX);
        let max_i64 = ValNumber::from(i64::MAX);
        let max_f64 = ValNumber::from(f64::MAX);

        let mins = vec![min_i64, min_f64];
        let maxs = vec![max_u64, max_i64, max_f64];

        // any min is less than any max
        for left in &mins {
            for right in &maxs {
                assert!(left.partial_cmp(right) == Some(Ordering::Less));
                assert!(right.partial_cmp(left) == Some(Ordering::Greater));
            }
        }
    }

    #[multiplatform_test]
    fn large_integers_keep_precision() {
        let left = ValNumber::from(u64::MAX);
        let right = ValNumber::from(u64::MAX - 1);

        assert_eq!(left.partial_cmp(&right), Some(Ordering::Greater));
    }

    #[multiplatform_test]
    fn total_order_across_kinds() {
        let mut values = vec![
            Val::Bool(false),
            Val::from("b"),
            Val::List(vec![]),
            Val::from(2i64),
            Val::Null,
            Val::from("a"),
            Val::from(1.5),
        ];
        values.sort_by(|l, r| l.total_cmp(r));

        assert_eq!(
            values,
            vec![
                Val::Null,
                Val::from(1.5),
                Val::from(2i64),
                Val::from("a"),
                Val::from("b"),
                Val::List(vec![]),
                Val::Bool(false),
            ]
        );
    }

    #[multiplatform_test]
    fn json_conversion_preserves_key_order() {
        let json = serde_json::json!({"name": "userName1", "skills": ["js", "go"], "age": 30});
        let val = Val::from(json);

        match &val {
            Val::Object(fields) => {
                assert_eq!(
                    fields.keys().collect::<Vec<_>>(),
                    vec!["name", "skills", "age"]
                );
            }
            _ => panic!("Expected an object"),
        }
    }

    #[multiplatform_test]
    fn const_value_conversion() {
        let value = ConstValue::List(vec![
            ConstValue::Enum(async_graphql_value::Name::new("ASC")),
            ConstValue::Null,
        ]);

        assert_eq!(
            Val::try_from(value).unwrap(),
            Val::List(vec![Val::Enum("ASC".into()), Val::Null])
        );
    }
}
