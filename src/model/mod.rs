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

//! High-level data types for the HR domain and their pure validators.

mod department;
mod employee;

pub(crate) use department::{Department, DepartmentData};
pub(crate) use employee::{Employee, EmployeeData};

/// A single validation failure, keyed to the offending input field.
///
/// The field names match the ones used in JSON payloads and form inputs so that the web layer
/// can attach messages next to the inputs that caused them.
#[derive(Debug, PartialEq)]
pub(crate) struct FieldError {
    /// Name of the offending input field.
    pub(crate) field: &'static str,

    /// Human-readable description of the violation.
    pub(crate) message: String,
}

impl FieldError {
    /// Creates a new violation for `field` described by `message`.
    pub(crate) fn new<S: Into<String>>(field: &'static str, message: S) -> Self {
        Self { field, message: message.into() }
    }
}
