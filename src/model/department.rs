// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The department entity and its validator.

use crate::model::FieldError;
use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Maximum length of a department name per the schema.
pub(crate) const MAX_NAME_LENGTH: usize = 15;

/// Maximum length of a department location per the schema.
pub(crate) const MAX_LOCATION_LENGTH: usize = 10;

/// A department row as persisted in the database.
#[derive(Clone, Constructor, Getters, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct Department {
    /// Surrogate key assigned by the store on creation.
    id: i64,

    /// Name of the department.
    name: String,

    /// Location of the department's office.
    location: String,

    /// Time at which the row was created.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Time at which the row was last modified.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

/// Caller-supplied department fields, as accepted by the create and update operations.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct DepartmentData {
    /// Name of the department.
    pub(crate) name: String,

    /// Location of the department's office.
    pub(crate) location: String,
}

impl DepartmentData {
    /// Checks field-level constraints, returning one entry per offending field.
    ///
    /// Lengths are counted in characters, not bytes, because the limits describe what a person
    /// may type into a form.
    pub(crate) fn validate(&self) -> Vec<FieldError> {
        let mut errors = vec![];

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "The department name cannot be empty"));
        } else if self.name.chars().count() > MAX_NAME_LENGTH {
            errors.push(FieldError::new(
                "name",
                format!("The department name must be at most {} characters long", MAX_NAME_LENGTH),
            ));
        }

        if self.location.trim().is_empty() {
            errors.push(FieldError::new("location", "The location cannot be empty"));
        } else if self.location.chars().count() > MAX_LOCATION_LENGTH {
            errors.push(FieldError::new(
                "location",
                format!("The location must be at most {} characters long", MAX_LOCATION_LENGTH),
            ));
        }

        errors
    }
}
