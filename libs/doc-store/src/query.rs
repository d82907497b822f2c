// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::value::Val;
use indexmap::{IndexMap, IndexSet};

/// A conjunction of per-field constraints such as `{ name: "userName1", gender: "male" }`.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(IndexMap<String, Val>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality constraint on `field`, replacing any earlier constraint on it.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Val>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Val) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Val> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Val)> {
        self.0.iter()
    }
}

impl From<IndexMap<String, Val>> for Filter {
    fn from(fields: IndexMap<String, Val>) -> Self {
        Filter(fields)
    }
}

/// Fields to populate on returned documents. An empty projection means "all fields".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection(IndexSet<String>);

impl Projection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection(fields.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    pub fn includes(&self, field: &str) -> bool {
        self.is_all() || self.0.contains(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Composite sort order; the first entry is the primary key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortSpec(pub Vec<(String, SortDirection)>);

impl SortSpec {
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        SortSpec(vec![(field.into(), direction)])
    }

    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.0.push((field.into(), direction));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A multi-document read.
///
/// Modifiers may be applied in any order; stores always apply `skip` before `limit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub projection: Projection,
    /// `None` means the store's natural order
    pub sort: Option<SortSpec>,
    pub skip: Option<usize>,
    /// `None` means the store's configured default
    pub limit: Option<usize>,
}

impl FindQuery {
    pub fn new(filter: Filter) -> Self {
        FindQuery {
            filter,
            ..Default::default()
        }
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
