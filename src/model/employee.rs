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

//! The employee entity and its validator.

use crate::model::FieldError;
use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Maximum length of an employee's last and first names per the schema.
pub(crate) const MAX_NAME_LENGTH: usize = 10;

/// Maximum length of an employee's email address per the schema.
pub(crate) const MAX_EMAIL_LENGTH: usize = 100;

/// Maximum length of an employee's position title per the schema.
pub(crate) const MAX_POSITION_LENGTH: usize = 15;

/// An employee row as persisted in the database.
///
/// `hire_date` is optional because the create operation tolerates its absence; see the driver
/// for details on that asymmetry.
#[derive(Clone, Constructor, Getters, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct Employee {
    /// Surrogate key assigned by the store on creation.
    id: i64,

    /// Family name of the employee.
    last_name: String,

    /// Given name of the employee.
    first_name: String,

    /// Contact email address, unique across all employees.
    email: String,

    /// Key of the department the employee belongs to.
    department_id: i64,

    /// Position title of the employee.
    position: String,

    /// Date the employee was hired.
    hire_date: Option<Date>,

    /// Time at which the row was created.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Time at which the row was last modified.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

/// Caller-supplied employee fields, as accepted by the create and update operations.
///
/// Fields that a caller may omit altogether are optionals so that the services can distinguish
/// "absent" from "present but invalid".
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct EmployeeData {
    /// Family name of the employee.
    pub(crate) last_name: String,

    /// Given name of the employee.
    pub(crate) first_name: String,

    /// Contact email address.
    pub(crate) email: Option<String>,

    /// Key of the department the employee belongs to.
    pub(crate) department_id: Option<i64>,

    /// Position title of the employee.
    pub(crate) position: Option<String>,

    /// Date the employee was hired.
    pub(crate) hire_date: Option<Date>,
}

impl EmployeeData {
    /// Checks field-level constraints, returning one entry per offending field.
    ///
    /// `today` anchors the hire date check so that the validator stays a pure function.  Only the
    /// first violation per field is reported, and lengths are counted in characters.
    pub(crate) fn validate(&self, today: Date) -> Vec<FieldError> {
        let mut errors = vec![];

        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("lastName", "The last name cannot be empty"));
        } else if self.last_name.chars().count() > MAX_NAME_LENGTH {
            errors.push(FieldError::new(
                "lastName",
                format!("The last name must be at most {} characters long", MAX_NAME_LENGTH),
            ));
        }

        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("firstName", "The first name cannot be empty"));
        } else if self.first_name.chars().count() > MAX_NAME_LENGTH {
            errors.push(FieldError::new(
                "firstName",
                format!("The first name must be at most {} characters long", MAX_NAME_LENGTH),
            ));
        }

        match &self.email {
            None => {
                errors.push(FieldError::new("email", "The email address cannot be empty"));
            }
            Some(email) => {
                // Email addresses can have many formats and attempting to fully validate them is
                // futile, but requiring an at sign and no spaces catches obvious typos.
                if email.trim().is_empty() {
                    errors.push(FieldError::new("email", "The email address cannot be empty"));
                } else if !email.contains('@') || email.contains(' ') {
                    errors.push(FieldError::new(
                        "email",
                        format!("'{}' does not look like a valid email address", email),
                    ));
                } else if email.chars().count() > MAX_EMAIL_LENGTH {
                    errors.push(FieldError::new(
                        "email",
                        format!(
                            "The email address must be at most {} characters long",
                            MAX_EMAIL_LENGTH
                        ),
                    ));
                }
            }
        }

        if self.department_id.is_none() {
            errors.push(FieldError::new("departmentId", "A department must be selected"));
        }

        match &self.position {
            None => errors.push(FieldError::new("position", "The position cannot be empty")),
            Some(position) => {
                if position.trim().is_empty() {
                    errors.push(FieldError::new("position", "The position cannot be empty"));
                } else if position.chars().count() > MAX_POSITION_LENGTH {
                    errors.push(FieldError::new(
                        "position",
                        format!(
                            "The position must be at most {} characters long",
                            MAX_POSITION_LENGTH
                        ),
                    ));
                }
            }
        }

        match self.hire_date {
            None => errors.push(FieldError::new("hireDate", "The hire date cannot be empty")),
            Some(hire_date) => {
                if hire_date > today {
                    errors.push(FieldError::new(
                        "hireDate",
                        "The hire date must be today or a past date",
                    ));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    /// Returns data that passes validation, to be broken by each test case.
    fn valid_data() -> EmployeeData {
        EmployeeData {
            last_name: "Sato".to_owned(),
            first_name: "Hanako".to_owned(),
            email: Some("hanako@example.com".to_owned()),
            department_id: Some(1),
            position: Some("Manager".to_owned()),
            hire_date: Some(date!(2024 - 04 - 01)),
        }
    }

    /// The fixed date used as "today" by these tests.
    const TODAY: Date = date!(2024 - 06 - 15);

    /// Asserts that `data` yields exactly one violation, keyed to `field`.
    fn assert_single_error(data: &EmployeeData, field: &str) -> String {
        let errors = data.validate(TODAY);
        assert_eq!(1, errors.len(), "Expected one violation but got {:?}", errors);
        assert_eq!(field, errors[0].field);
        errors[0].message.clone()
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_data().validate(TODAY).is_empty());
    }

    #[test]
    fn test_validate_names() {
        let mut data = valid_data();
        data.last_name = "  ".to_owned();
        assert_single_error(&data, "lastName");

        let mut data = valid_data();
        data.last_name = "12345678901".to_owned();
        let message = assert_single_error(&data, "lastName");
        assert!(message.contains("at most 10"));

        let mut data = valid_data();
        data.first_name = "".to_owned();
        assert_single_error(&data, "firstName");
    }

    #[test]
    fn test_validate_email() {
        let mut data = valid_data();
        data.email = None;
        assert_single_error(&data, "email");

        let mut data = valid_data();
        data.email = Some("".to_owned());
        assert_single_error(&data, "email");

        let mut data = valid_data();
        data.email = Some("no-at-sign".to_owned());
        let message = assert_single_error(&data, "email");
        assert!(message.contains("does not look like"));

        let mut data = valid_data();
        data.email = Some("has a@space.com".to_owned());
        assert_single_error(&data, "email");

        let mut data = valid_data();
        data.email = Some(format!("{}@example.com", "x".repeat(88)));
        assert!(data.validate(TODAY).is_empty());
        data.email = Some(format!("{}@example.com", "x".repeat(89)));
        let message = assert_single_error(&data, "email");
        assert!(message.contains("at most 100"));
    }

    #[test]
    fn test_validate_department_required() {
        let mut data = valid_data();
        data.department_id = None;
        let message = assert_single_error(&data, "departmentId");
        assert!(message.contains("must be selected"));
    }

    #[test]
    fn test_validate_position() {
        let mut data = valid_data();
        data.position = None;
        assert_single_error(&data, "position");

        let mut data = valid_data();
        data.position = Some("1234567890123456".to_owned());
        let message = assert_single_error(&data, "position");
        assert!(message.contains("at most 15"));
    }

    #[test]
    fn test_validate_hire_date() {
        let mut data = valid_data();
        data.hire_date = None;
        assert_single_error(&data, "hireDate");

        let mut data = valid_data();
        data.hire_date = Some(date!(2024 - 06 - 16));
        let message = assert_single_error(&data, "hireDate");
        assert!(message.contains("past date"));

        // Hiring today is allowed.
        let mut data = valid_data();
        data.hire_date = Some(TODAY);
        assert!(data.validate(TODAY).is_empty());
    }

    #[test]
    fn test_validate_reports_all_fields() {
        let data = EmployeeData::default();
        let fields: Vec<&str> = data.validate(TODAY).into_iter().map(|e| e.field).collect();
        assert_eq!(
            vec!["lastName", "firstName", "email", "departmentId", "position", "hireDate"],
            fields
        );
    }
}
