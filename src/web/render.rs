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

//! Form state and HTML rendering for the web interface.
//!
//! Pages are plain HTML assembled with the trivial template engine.  Forms re-render with the
//! caller's raw input and with the messages of any violations attached next to the inputs that
//! caused them, so this module models form state as raw strings, not as typed payloads.

use crate::model::{Department, DepartmentData, Employee, EmployeeData, FieldError};
use crate::template::expand;
use axum::response::Html;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

/// Format used by `<input type="date">` values.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Escapes `raw` for inclusion in HTML text or attribute values.
pub(crate) fn html_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            ch => escaped.push(ch),
        }
    }
    escaped
}

/// Collection of errors to show in a re-rendered form: some attached to individual fields and
/// some applying to the submission as a whole.
#[derive(Default)]
pub(crate) struct FormErrors {
    /// Violations attached to a specific input field.
    fields: Vec<FieldError>,

    /// Errors that do not belong to any single field.
    globals: Vec<String>,
}

impl FormErrors {
    /// Attaches a violation to its field.
    pub(crate) fn attach(&mut self, error: FieldError) {
        self.fields.push(error);
    }

    /// Attaches an error to the form as a whole.
    pub(crate) fn attach_global<S: Into<String>>(&mut self, message: S) {
        self.globals.push(message.into());
    }

    /// Checks whether any violation was attached to `field`.
    pub(crate) fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|e| e.field == field)
    }

    /// Checks whether the form can be submitted, i.e. no errors were attached at all.
    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.globals.is_empty()
    }

    /// Renders the messages attached to `field`.
    fn field_html(&self, field: &str) -> String {
        let mut html = String::new();
        for error in self.fields.iter().filter(|e| e.field == field) {
            html.push_str(&format!(
                " <span class=\"field-error\">{}</span>",
                html_escape(&error.message)
            ));
        }
        html
    }

    /// Renders the messages that apply to the form as a whole.
    fn global_html(&self) -> String {
        let mut html = String::new();
        for message in &self.globals {
            html.push_str(&format!("<p class=\"form-error\">{}</p>\n", html_escape(message)));
        }
        html
    }
}

/// Query parameters recognized by the list pages.
///
/// The redirects issued after failed operations carry these markers so that the list can show
/// what happened without ever rendering an error page.
#[derive(Default, Deserialize)]
pub(crate) struct ListQuery {
    /// Present when the previous operation targeted an entry that does not exist.
    not_found: Option<String>,

    /// Present when the previous operation failed to delete an entry.
    delete_error: Option<String>,
}

impl ListQuery {
    /// Renders the banner paragraphs for the markers present in the query.
    fn banner_html(&self) -> String {
        let mut html = String::new();
        if self.not_found.is_some() {
            html.push_str("<p class=\"banner\">The requested entry could not be found.</p>\n");
        }
        if self.delete_error.is_some() {
            html.push_str("<p class=\"banner\">The entry could not be deleted.</p>\n");
        }
        html
    }
}

/// Raw employee form values, as received from or echoed back to the browser.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct EmployeeForm {
    /// Family name of the employee.
    pub(crate) last_name: String,

    /// Given name of the employee.
    pub(crate) first_name: String,

    /// Contact email address.
    pub(crate) email: String,

    /// Key of the selected department, as the string value of the drop-down option.
    pub(crate) department_id: String,

    /// Position title of the employee.
    pub(crate) position: String,

    /// Hire date in `YYYY-MM-DD` form.
    pub(crate) hire_date: String,
}

impl From<&Employee> for EmployeeForm {
    fn from(employee: &Employee) -> Self {
        Self {
            last_name: employee.last_name().clone(),
            first_name: employee.first_name().clone(),
            email: employee.email().clone(),
            department_id: employee.department_id().to_string(),
            position: employee.position().clone(),
            hire_date: match employee.hire_date() {
                Some(date) => format_date(*date),
                None => String::new(),
            },
        }
    }
}

impl EmployeeForm {
    /// Converts the raw form values into the typed payload the driver understands, attaching
    /// any parse failures to `errors`.
    ///
    /// Empty inputs become absent fields so that the shared validator reports them as missing
    /// rather than as malformed.
    pub(crate) fn to_data(&self, errors: &mut FormErrors) -> EmployeeData {
        let department_id = if self.department_id.is_empty() {
            None
        } else {
            match self.department_id.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.attach(FieldError::new(
                        "departmentId",
                        "The selected department is not valid",
                    ));
                    None
                }
            }
        };

        let hire_date = if self.hire_date.is_empty() {
            None
        } else {
            match Date::parse(&self.hire_date, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.attach(FieldError::new(
                        "hireDate",
                        "The hire date must be a date in YYYY-MM-DD form",
                    ));
                    None
                }
            }
        };

        EmployeeData {
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            email: if self.email.is_empty() { None } else { Some(self.email.clone()) },
            department_id,
            position: if self.position.is_empty() { None } else { Some(self.position.clone()) },
            hire_date,
        }
    }
}

/// Formats a date the way form inputs expect it.
pub(crate) fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).expect("Formatting with a fixed description must succeed")
}

/// The home page.
const HOME_PAGE: &str = r#"<html>
<head><title>HR registry</title></head>

<body>
<h1>HR registry</h1>

<ul>
<li><a href="/web/departments">Departments</a></li>
<li><a href="/web/employees">Employees</a></li>
</ul>
</body>
</html>
"#;

/// Renders the home page.
pub(crate) fn home_page() -> Html<String> {
    Html(HOME_PAGE.to_owned())
}

/// Template for the department list page.
const DEPARTMENTS_LIST_TEMPLATE: &str = r#"<html>
<head><title>Departments</title></head>

<body>
<h1>Departments</h1>
%banner%
<table>
<tr><th>Id</th><th>Name</th><th>Location</th><th></th></tr>
%rows%
</table>

<p><a href="/web/departments/new">Add a department</a></p>
<p><a href="/web">Back to the home page</a></p>
</body>
</html>
"#;

/// Renders the department list page.
pub(crate) fn departments_list_page(
    departments: &[Department],
    query: &ListQuery,
) -> Html<String> {
    let mut rows = String::new();
    for department in departments {
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{name}</td><td>{location}</td>\
             <td><a href=\"/web/departments/edit/{id}\">Edit</a> \
             <form method=\"post\" action=\"/web/departments/delete/{id}\">\
             <input type=\"submit\" value=\"Delete\"></form></td></tr>\n",
            id = department.id(),
            name = html_escape(department.name()),
            location = html_escape(department.location()),
        ));
    }

    Html(expand(
        DEPARTMENTS_LIST_TEMPLATE,
        &[("banner", &query.banner_html()), ("rows", &rows)],
    ))
}

/// Template for the department create/edit form.
const DEPARTMENT_FORM_TEMPLATE: &str = r#"<html>
<head><title>%title%</title></head>

<body>
<h1>%title%</h1>
%form_errors%
<form method="post" action="%action%">
<p><label for="name">Name</label>
<input type="text" id="name" name="name" value="%name%">%name_errors%</p>
<p><label for="location">Location</label>
<input type="text" id="location" name="location" value="%location%">%location_errors%</p>
<p><input type="submit" value="Save"></p>
</form>

<p><a href="/web/departments">Back to the department list</a></p>
</body>
</html>
"#;

/// Renders the department form with the given input values and errors.
pub(crate) fn department_form_page(
    title: &str,
    action: &str,
    data: &DepartmentData,
    errors: &FormErrors,
) -> Html<String> {
    Html(expand(
        DEPARTMENT_FORM_TEMPLATE,
        &[
            ("title", title),
            ("action", action),
            ("form_errors", &errors.global_html()),
            ("name", &html_escape(&data.name)),
            ("name_errors", &errors.field_html("name")),
            ("location", &html_escape(&data.location)),
            ("location_errors", &errors.field_html("location")),
        ],
    ))
}

/// Template for the employee list page.
const EMPLOYEES_LIST_TEMPLATE: &str = r#"<html>
<head><title>Employees</title></head>

<body>
<h1>Employees</h1>
%banner%
<table>
<tr><th>Id</th><th>Name</th><th>Email</th><th>Department</th><th>Position</th>
<th>Hire date</th><th></th></tr>
%rows%
</table>

<p><a href="/web/employees/new">Add an employee</a></p>
<p><a href="/web">Back to the home page</a></p>
</body>
</html>
"#;

/// Renders the employee list page.
///
/// `department_names` maps department keys to display names; employees pointing at a key with no
/// entry render with an "Unknown" department.
pub(crate) fn employees_list_page(
    employees: &[Employee],
    department_names: &HashMap<i64, String>,
    query: &ListQuery,
) -> Html<String> {
    let mut rows = String::new();
    for employee in employees {
        let department = match department_names.get(employee.department_id()) {
            Some(name) => html_escape(name),
            None => "Unknown".to_owned(),
        };
        let hire_date = match employee.hire_date() {
            Some(date) => format_date(*date),
            None => String::new(),
        };
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{last_name} {first_name}</td><td>{email}</td>\
             <td>{department}</td><td>{position}</td><td>{hire_date}</td>\
             <td><a href=\"/web/employees/edit/{id}\">Edit</a> \
             <form method=\"post\" action=\"/web/employees/delete/{id}\">\
             <input type=\"submit\" value=\"Delete\"></form></td></tr>\n",
            id = employee.id(),
            last_name = html_escape(employee.last_name()),
            first_name = html_escape(employee.first_name()),
            email = html_escape(employee.email()),
            department = department,
            position = html_escape(employee.position()),
            hire_date = hire_date,
        ));
    }

    Html(expand(
        EMPLOYEES_LIST_TEMPLATE,
        &[("banner", &query.banner_html()), ("rows", &rows)],
    ))
}

/// Template for the employee create/edit form.
const EMPLOYEE_FORM_TEMPLATE: &str = r#"<html>
<head><title>%title%</title></head>

<body>
<h1>%title%</h1>
%form_errors%
<form method="post" action="%action%">
<p><label for="lastName">Last name</label>
<input type="text" id="lastName" name="lastName" value="%last_name%">%last_name_errors%</p>
<p><label for="firstName">First name</label>
<input type="text" id="firstName" name="firstName" value="%first_name%">%first_name_errors%</p>
<p><label for="email">Email</label>
<input type="text" id="email" name="email" value="%email%">%email_errors%</p>
<p><label for="departmentId">Department</label>
<select id="departmentId" name="departmentId">%department_options%</select>%department_errors%</p>
<p><label for="position">Position</label>
<input type="text" id="position" name="position" value="%position%">%position_errors%</p>
<p><label for="hireDate">Hire date</label>
<input type="date" id="hireDate" name="hireDate" value="%hire_date%">%hire_date_errors%</p>
<p><input type="submit" value="Save"></p>
</form>

<p><a href="/web/employees">Back to the employee list</a></p>
</body>
</html>
"#;

/// Renders the employee form with the given input values and errors.
///
/// The department drop-down is built from `departments` on every render, error re-renders
/// included, and keeps the entry matching the form's current selection marked as selected.
pub(crate) fn employee_form_page(
    title: &str,
    action: &str,
    form: &EmployeeForm,
    departments: &[Department],
    errors: &FormErrors,
) -> Html<String> {
    let mut options = String::from("<option value=\"\">-- Select --</option>\n");
    for department in departments {
        let selected =
            if department.id().to_string() == form.department_id { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            department.id(),
            selected,
            html_escape(department.name()),
        ));
    }

    Html(expand(
        EMPLOYEE_FORM_TEMPLATE,
        &[
            ("title", title),
            ("action", action),
            ("form_errors", &errors.global_html()),
            ("last_name", &html_escape(&form.last_name)),
            ("last_name_errors", &errors.field_html("lastName")),
            ("first_name", &html_escape(&form.first_name)),
            ("first_name_errors", &errors.field_html("firstName")),
            ("email", &html_escape(&form.email)),
            ("email_errors", &errors.field_html("email")),
            ("department_options", &options),
            ("department_errors", &errors.field_html("departmentId")),
            ("position", &html_escape(&form.position)),
            ("position_errors", &errors.field_html("position")),
            ("hire_date", &html_escape(&form.hire_date)),
            ("hire_date_errors", &errors.field_html("hireDate")),
        ],
    ))
}
