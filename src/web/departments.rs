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

//! Web pages to manage departments.

use crate::driver::{Driver, DriverError};
use crate::model::DepartmentData;
use crate::rest::RestError;
use crate::web::render::{self, FormErrors, ListQuery};
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use log::error;

/// Title of the form that creates a department.
const CREATE_TITLE: &str = "Add department";

/// Title of the form that edits a department.
const EDIT_TITLE: &str = "Edit department";

/// Attaches a driver failure to the form, hiding the details of unexpected backend errors.
fn attach_failure(e: DriverError, errors: &mut FormErrors) {
    match e {
        DriverError::BackendError(message) => {
            error!("Backend error while saving a department: {}", message);
            errors.attach_global("An unexpected error occurred while saving the department");
        }
        e => errors.attach_global(e.to_string()),
    }
}

/// GET handler for the department list.
pub(crate) async fn list(
    State(driver): State<Driver>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, RestError> {
    let departments = driver.get_departments().await?;
    Ok(render::departments_list_page(&departments, &query))
}

/// GET handler for the empty department form.
pub(crate) async fn new_form() -> Html<String> {
    render::department_form_page(
        CREATE_TITLE,
        "/web/departments",
        &DepartmentData::default(),
        &FormErrors::default(),
    )
}

/// POST handler for department creation.
pub(crate) async fn create(
    State(driver): State<Driver>,
    Form(data): Form<DepartmentData>,
) -> Result<Response, RestError> {
    let mut errors = FormErrors::default();
    for error in data.validate() {
        errors.attach(error);
    }
    if !errors.is_empty() {
        let page =
            render::department_form_page(CREATE_TITLE, "/web/departments", &data, &errors);
        return Ok(page.into_response());
    }

    match driver.create_department(data.clone()).await {
        Ok(_department) => Ok(Redirect::to("/web/departments").into_response()),
        Err(e) => {
            attach_failure(e, &mut errors);
            let page =
                render::department_form_page(CREATE_TITLE, "/web/departments", &data, &errors);
            Ok(page.into_response())
        }
    }
}

/// GET handler for the department form prefilled with an existing row.
pub(crate) async fn edit_form(
    State(driver): State<Driver>,
    Path(id): Path<i64>,
) -> Result<Response, RestError> {
    match driver.get_department(id).await {
        Ok(department) => {
            let data = DepartmentData {
                name: department.name().clone(),
                location: department.location().clone(),
            };
            let page = render::department_form_page(
                EDIT_TITLE,
                &format!("/web/departments/update/{}", id),
                &data,
                &FormErrors::default(),
            );
            Ok(page.into_response())
        }
        Err(DriverError::NotFound(_)) => {
            Ok(Redirect::to("/web/departments?not_found").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST handler for department updates.
pub(crate) async fn update(
    State(driver): State<Driver>,
    Path(id): Path<i64>,
    Form(data): Form<DepartmentData>,
) -> Result<Response, RestError> {
    let action = format!("/web/departments/update/{}", id);

    let mut errors = FormErrors::default();
    for error in data.validate() {
        errors.attach(error);
    }
    if !errors.is_empty() {
        let page = render::department_form_page(EDIT_TITLE, &action, &data, &errors);
        return Ok(page.into_response());
    }

    match driver.update_department(id, data.clone()).await {
        Ok(_department) => Ok(Redirect::to("/web/departments").into_response()),
        Err(e) => {
            attach_failure(e, &mut errors);
            let page = render::department_form_page(EDIT_TITLE, &action, &data, &errors);
            Ok(page.into_response())
        }
    }
}

/// POST handler for department deletion.
///
/// Failures redirect back to the list with a marker; this never renders an error page.
pub(crate) async fn delete(
    State(driver): State<Driver>,
    Path(id): Path<i64>,
) -> Result<Response, RestError> {
    match driver.delete_department(id).await {
        Ok(_affected) => Ok(Redirect::to("/web/departments").into_response()),
        Err(DriverError::NotFound(_) | DriverError::InvalidInput(_)) => {
            Ok(Redirect::to("/web/departments?delete_error").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
