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

//! Test utilities for the HTTP interfaces.
//!
//! The `OneShotBuilder`/`ResponseChecker` pair drives a router without a running server and is
//! shared with the web interface tests; the `TestContext` here wires the REST router in
//! particular.

use crate::clocks::testutils::SettableClock;
use crate::clocks::Clock;
use crate::db::{departments, employees, init_schema, Db};
use crate::driver::Driver;
use crate::model::{Department, DepartmentData, Employee, EmployeeData};
use axum::http::{self, HeaderName};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use time::macros::{date, datetime};
use tower::util::ServiceExt;

/// Maximum body size for testing purposes.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Builds caller-supplied data for a test employee belonging to `department_id`.
pub(crate) fn employee_data(email: &str, department_id: i64) -> EmployeeData {
    EmployeeData {
        last_name: "Sato".to_owned(),
        first_name: "Hanako".to_owned(),
        email: Some(email.to_owned()),
        department_id: Some(department_id),
        position: Some("Manager".to_owned()),
        hire_date: Some(date!(2024 - 04 - 01)),
    }
}

/// Builder for a single request to the API server.
#[must_use]
pub(crate) struct OneShotBuilder {
    /// The router for the app being tested.
    app: Router,

    /// Builder for the request that will be sent to the app.
    builder: http::request::Builder,
}

impl OneShotBuilder {
    /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
    pub(crate) fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
        let builder = http::Request::builder().method(method).uri(uri.as_ref());
        Self { app, builder }
    }

    /// Finishes building the request and sends it with an empty payload.
    pub(crate) async fn send_empty(self) -> ResponseChecker {
        let request = self.builder.body(axum::body::Body::empty()).unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a text payload.
    pub(crate) async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
            .body(axum::body::Body::from(text.into()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a form encoded in the body as the payload.
    pub(crate) async fn send_form<T: Serialize>(self, request: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
            .body(axum::body::Body::from(serde_urlencoded::to_string(&request).unwrap()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }

    /// Finishes building the request and sends it with a JSON payload.
    pub(crate) async fn send_json<T: Serialize>(self, request: T) -> ResponseChecker {
        let request = self
            .builder
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(axum::body::Body::from(serde_json::to_vec(&request).unwrap()))
            .unwrap();
        ResponseChecker::from(self.app.oneshot(request).await.unwrap())
    }
}

/// Type alias for the complex type returned by the `oneshot` function.
type HttpResponse = hyper::Response<axum::body::Body>;

/// Validator for the outcome of a request sent by a `OneShotBuilder`.
#[must_use]
pub(crate) struct ResponseChecker {
    /// Actual response that we received from the app.
    response: HttpResponse,

    /// Expected HTTP status code in the response above.
    exp_status: http::StatusCode,

    /// Expected headers and their values in the response above.
    exp_headers: Vec<(HeaderName, String)>,
}

impl From<HttpResponse> for ResponseChecker {
    fn from(response: HttpResponse) -> Self {
        Self { response, exp_status: http::StatusCode::OK, exp_headers: vec![] }
    }
}

impl ResponseChecker {
    /// Sets the expected exit HTTP status to `status`.
    pub(crate) fn expect_status(mut self, status: http::StatusCode) -> Self {
        self.exp_status = status;
        self
    }

    /// Adds `name`/`value` to the headers that must appear in the response.
    pub(crate) fn expect_header(mut self, name: HeaderName, value: &str) -> Self {
        self.exp_headers.push((name, value.to_owned()));
        self
    }

    /// Performs common validation operations on the response.
    pub(crate) fn verify(&self) {
        assert_eq!(self.exp_status, self.response.status());
        for (name, exp_value) in &self.exp_headers {
            match self.response.headers().get(name) {
                Some(value) => assert_eq!(
                    exp_value,
                    value.to_str().unwrap(),
                    "Header {} has an unexpected value",
                    name
                ),
                None => panic!("Header {} not present in the response", name),
            }
        }
    }

    /// Finishes checking the response and expects it to contain an empty body.
    pub(crate) async fn expect_empty(self) {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.is_empty(), "Body not empty; got {}", body);
    }

    /// Finishes checking the response and expects it to contain a valid JSON object of type `T`.
    pub(crate) async fn expect_json<T: DeserializeOwned>(self) -> T {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        serde_json::from_slice::<T>(&body).unwrap()
    }

    /// Finishes checking the response and expects its body to be valid UTF-8 and to match
    /// `exp_re`.
    pub(crate) async fn expect_text(self, exp_re: &str) {
        assert!(!exp_re.is_empty(), "Use expect_empty to validate empty responses");

        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        let re = regex::Regex::new(exp_re).unwrap();
        assert!(re.is_match(&body), "Body content '{}' does not match re '{}'", body, exp_re);
    }

    /// Finishes checking the response and returns the body of the response as UTF-8.
    pub(crate) async fn take_body_as_text(self) -> String {
        self.verify();

        let body = axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}

/// State of a running test, giving access to the REST router and to the database underneath it.
pub(crate) struct TestContext {
    /// The database the app is backed by.
    db: Arc<dyn Db + Send + Sync>,

    /// The fake clock the app reads timestamps from.
    clock: Arc<SettableClock>,

    /// The router under test.
    app: Router,
}

impl TestContext {
    /// Initializes an in-memory database and the REST router on top of it.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(crate::db::sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(datetime!(2024-06-15 12:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        let app = crate::rest::app(driver);
        Self { db, clock, app }
    }

    /// Returns the router under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the router under test.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Inserts a department directly into the database and returns its key.
    pub(crate) async fn insert_department(&self, name: &str, location: &str) -> i64 {
        let data = DepartmentData { name: name.to_owned(), location: location.to_owned() };
        departments::create_department(
            &mut self.db.ex().await.unwrap(),
            &data,
            self.clock.now_utc(),
        )
        .await
        .unwrap()
    }

    /// Inserts an employee directly into the database and returns its key.
    pub(crate) async fn insert_employee(&self, data: &EmployeeData) -> i64 {
        employees::create_employee(&mut self.db.ex().await.unwrap(), data, self.clock.now_utc())
            .await
            .unwrap()
    }

    /// Reads a department directly from the database.
    pub(crate) async fn get_department(&self, id: i64) -> Option<Department> {
        departments::get_department(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    /// Reads an employee directly from the database.
    pub(crate) async fn get_employee(&self, id: i64) -> Option<Employee> {
        employees::get_employee(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    /// Counts the departments currently in the database.
    pub(crate) async fn count_departments(&self) -> usize {
        departments::list_departments(&mut self.db.ex().await.unwrap()).await.unwrap().len()
    }

    /// Counts the employees currently in the database.
    pub(crate) async fn count_employees(&self) -> usize {
        employees::list_employees(&mut self.db.ex().await.unwrap()).await.unwrap().len()
    }
}
