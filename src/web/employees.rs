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

//! Web pages to manage employees.
//!
//! These handlers need the department list for the form's drop-down on every render, and they
//! join department names into the employee list themselves: the cross-entity lookup is a
//! read-side display concern, so it stays out of the driver.

use crate::driver::{Driver, DriverError};
use crate::model::{EmployeeData, FieldError};
use crate::rest::RestError;
use crate::web::render::{self, EmployeeForm, FormErrors, ListQuery};
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use log::error;
use std::collections::HashMap;

/// Title of the form that creates an employee.
const CREATE_TITLE: &str = "Add employee";

/// Title of the form that edits an employee.
const EDIT_TITLE: &str = "Edit employee";

/// Attaches a driver failure to the form: duplicate emails land on the email field and
/// unexpected backend errors are masked behind a generic message.
fn attach_failure(e: DriverError, errors: &mut FormErrors) {
    match e {
        DriverError::AlreadyExists(message) => {
            errors.attach(FieldError::new("email", message));
        }
        DriverError::BackendError(message) => {
            error!("Backend error while saving an employee: {}", message);
            errors.attach_global("An unexpected error occurred while saving the employee");
        }
        e => errors.attach_global(e.to_string()),
    }
}

/// Runs the shared validator over the parsed form, skipping fields that already carry a parse
/// error so that a field never shows two contradictory messages.
fn validate_form(driver: &Driver, form: &EmployeeForm, errors: &mut FormErrors) -> EmployeeData {
    let data = form.to_data(errors);
    for error in data.validate(driver.today()) {
        if !errors.has_field(error.field) {
            errors.attach(error);
        }
    }
    data
}

/// GET handler for the employee list.
pub(crate) async fn list(
    State(driver): State<Driver>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, RestError> {
    let employees = driver.clone().get_employees().await?;

    let mut department_names = HashMap::new();
    for department in driver.get_departments().await? {
        department_names.insert(*department.id(), department.name().clone());
    }

    Ok(render::employees_list_page(&employees, &department_names, &query))
}

/// GET handler for the empty employee form.
pub(crate) async fn new_form(State(driver): State<Driver>) -> Result<Html<String>, RestError> {
    let departments = driver.get_departments().await?;
    Ok(render::employee_form_page(
        CREATE_TITLE,
        "/web/employees",
        &EmployeeForm::default(),
        &departments,
        &FormErrors::default(),
    ))
}

/// POST handler for employee creation.
pub(crate) async fn create(
    State(driver): State<Driver>,
    Form(form): Form<EmployeeForm>,
) -> Result<Response, RestError> {
    let mut errors = FormErrors::default();
    let data = validate_form(&driver, &form, &mut errors);
    if !errors.is_empty() {
        let departments = driver.get_departments().await?;
        let page = render::employee_form_page(
            CREATE_TITLE,
            "/web/employees",
            &form,
            &departments,
            &errors,
        );
        return Ok(page.into_response());
    }

    match driver.clone().create_employee(data).await {
        Ok(_employee) => Ok(Redirect::to("/web/employees").into_response()),
        Err(e) => {
            attach_failure(e, &mut errors);
            let departments = driver.get_departments().await?;
            let page = render::employee_form_page(
                CREATE_TITLE,
                "/web/employees",
                &form,
                &departments,
                &errors,
            );
            Ok(page.into_response())
        }
    }
}

/// GET handler for the employee form prefilled with an existing row.
pub(crate) async fn edit_form(
    State(driver): State<Driver>,
    Path(id): Path<i64>,
) -> Result<Response, RestError> {
    match driver.clone().get_employee(id).await {
        Ok(employee) => {
            let departments = driver.get_departments().await?;
            let page = render::employee_form_page(
                EDIT_TITLE,
                &format!("/web/employees/update/{}", id),
                &EmployeeForm::from(&employee),
                &departments,
                &FormErrors::default(),
            );
            Ok(page.into_response())
        }
        Err(DriverError::NotFound(_)) => {
            Ok(Redirect::to("/web/employees?not_found").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST handler for employee updates.
pub(crate) async fn update(
    State(driver): State<Driver>,
    Path(id): Path<i64>,
    Form(form): Form<EmployeeForm>,
) -> Result<Response, RestError> {
    let action = format!("/web/employees/update/{}", id);

    let mut errors = FormErrors::default();
    let data = validate_form(&driver, &form, &mut errors);
    if !errors.is_empty() {
        let departments = driver.get_departments().await?;
        let page =
            render::employee_form_page(EDIT_TITLE, &action, &form, &departments, &errors);
        return Ok(page.into_response());
    }

    match driver.clone().update_employee(id, data).await {
        Ok(_employee) => Ok(Redirect::to("/web/employees").into_response()),
        Err(e) => {
            attach_failure(e, &mut errors);
            let departments = driver.get_departments().await?;
            let page =
                render::employee_form_page(EDIT_TITLE, &action, &form, &departments, &errors);
            Ok(page.into_response())
        }
    }
}

/// POST handler for employee deletion.
///
/// Failures redirect back to the list with a marker; this never renders an error page.
pub(crate) async fn delete(
    State(driver): State<Driver>,
    Path(id): Path<i64>,
) -> Result<Response, RestError> {
    match driver.delete_employee(id).await {
        Ok(_affected) => Ok(Redirect::to("/web/employees").into_response()),
        Err(DriverError::NotFound(_) | DriverError::InvalidInput(_)) => {
            Ok(Redirect::to("/web/employees?delete_error").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
