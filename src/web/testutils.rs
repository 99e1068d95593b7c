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

//! Test utilities for the web interface.

use crate::clocks::testutils::SettableClock;
use crate::clocks::Clock;
use crate::db::{departments, employees, init_schema, Db};
use crate::driver::Driver;
use crate::model::{Department, DepartmentData, Employee, EmployeeData};
use axum::Router;
use std::sync::Arc;
use time::macros::{date, datetime};

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

/// State of a running test, giving access to the web router and to the database underneath it.
pub(crate) struct TestContext {
    /// The database the app is backed by.
    db: Arc<dyn Db + Send + Sync>,

    /// The fake clock the app reads timestamps from.
    clock: Arc<SettableClock>,

    /// The router under test.
    app: Router,
}

impl TestContext {
    /// Initializes an in-memory database and the web router on top of it.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(crate::db::sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(datetime!(2024-06-15 12:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        let app = crate::web::app(driver);
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
