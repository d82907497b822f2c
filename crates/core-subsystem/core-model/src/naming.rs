// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Names of the generated types and root fields.

use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// `User` + `contacts` → `UserContacts`
pub fn nested_object_type_name(parent_type: &str, field: &str) -> String {
    format!("{parent_type}{}", field.to_upper_camel_case())
}

pub fn filter_type_name(type_name: &str) -> String {
    format!("FilterFindMany{type_name}Input")
}

pub fn sort_type_name(type_name: &str) -> String {
    format!("SortFindMany{type_name}Input")
}

pub fn remove_payload_type_name(type_name: &str) -> String {
    format!("RemoveById{type_name}Payload")
}

/// Root field under which a resolver is exposed: `User` + `findMany` → `userFindMany`
pub fn root_field_name(type_name: &str, resolver_name: &str) -> String {
    format!(
        "{}{}",
        type_name.to_lower_camel_case(),
        resolver_name.to_upper_camel_case()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn generated_names() {
        assert_eq!(nested_object_type_name("User", "contacts"), "UserContacts");
        assert_eq!(
            nested_object_type_name("User", "home_address"),
            "UserHomeAddress"
        );
        assert_eq!(filter_type_name("User"), "FilterFindManyUserInput");
        assert_eq!(sort_type_name("User"), "SortFindManyUserInput");
        assert_eq!(remove_payload_type_name("User"), "RemoveByIdUserPayload");
        assert_eq!(root_field_name("User", "findMany"), "userFindMany");
        assert_eq!(root_field_name("BlogPost", "removeById"), "blogPostRemoveById");
    }
}
