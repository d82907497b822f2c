// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Filter evaluation, ordering, and projection over stored records.

use std::cmp::Ordering;

use common::value::Val;
use indexmap::IndexMap;

use crate::{Filter, Projection, SortDirection, SortSpec};

pub(super) type Record = IndexMap<String, Val>;

const NULL: Val = Val::Null;

pub(super) fn matches(record: &Record, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(field, expected)| value_matches(record.get(field).unwrap_or(&NULL), expected))
}

// - an object constraint matches field-wise (unmentioned fields are unconstrained)
// - a non-list constraint on a list matches if any element matches
// - a missing field behaves as null
fn value_matches(actual: &Val, expected: &Val) -> bool {
    match (actual, expected) {
        (Val::Object(actual), Val::Object(expected)) => expected
            .iter()
            .all(|(field, value)| value_matches(actual.get(field).unwrap_or(&NULL), value)),
        (Val::List(items), expected) if !matches!(expected, Val::List(_)) => {
            items.iter().any(|item| value_matches(item, expected))
        }
        (Val::String(actual), Val::Enum(expected)) | (Val::Enum(actual), Val::String(expected)) => {
            actual == expected
        }
        (actual, expected) => actual == expected,
    }
}

pub(super) fn compare(left: &Record, right: &Record, sort: &SortSpec) -> Ordering {
    sort.0
        .iter()
        .map(|(field, direction)| {
            let ordering = left
                .get(field)
                .unwrap_or(&NULL)
                .total_cmp(right.get(field).unwrap_or(&NULL));

            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Keep only the projected fields, always retaining the identifier.
pub(super) fn project(record: &Record, projection: &Projection, id_field: &str) -> Record {
    if projection.is_all() {
        return record.clone();
    }

    record
        .iter()
        .filter(|(field, _)| field.as_str() == id_field || projection.includes(field))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}
