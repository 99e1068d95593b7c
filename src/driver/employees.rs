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

//! Operations on employees.
//!
//! Unlike the department operations, these only enforce the presence of required fields and
//! leave lengths, email format and email uniqueness to the store's constraints.  A unique
//! constraint violation is remapped here so that the presentation layers can tell a duplicate
//! email apart from any other backend failure.

use crate::db::employees as db;
use crate::db::DbError;
use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::{Employee, EmployeeData};

/// Message attached to duplicate-email failures.
const DUPLICATE_EMAIL_MESSAGE: &str = "An employee with this email address already exists";

/// Checks the presence of the fields that both create and update require.
fn validate_required(data: &EmployeeData) -> DriverResult<()> {
    if data.last_name.is_empty() || data.first_name.is_empty() {
        return Err(DriverError::InvalidInput(
            "The last and first names cannot be empty".to_owned(),
        ));
    }
    if data.email.is_none() {
        return Err(DriverError::InvalidInput("An email address is required".to_owned()));
    }
    if data.position.is_none() {
        return Err(DriverError::InvalidInput("A position is required".to_owned()));
    }
    Ok(())
}

/// Builds the error that reports the absence of the employee `id`.
fn not_found(id: i64) -> DriverError {
    DriverError::NotFound(format!("No employee found with id {}", id))
}

impl Driver {
    /// Gets all employees.
    pub(crate) async fn get_employees(self) -> DriverResult<Vec<Employee>> {
        let employees = db::list_employees(&mut self.db.ex().await?).await?;
        Ok(employees)
    }

    /// Gets the employee with the given `id`.
    pub(crate) async fn get_employee(self, id: i64) -> DriverResult<Employee> {
        match db::get_employee(&mut self.db.ex().await?, id).await? {
            Some(employee) => Ok(employee),
            None => Err(not_found(id)),
        }
    }

    /// Creates a new employee from `data` and returns it as re-read from the store.
    ///
    /// The hire date is intentionally not required by this operation even though the update
    /// operation does require it.  Existing callers rely on creating records before the hire
    /// date is known, so do not unify the two checks without auditing them first.
    pub(crate) async fn create_employee(self, data: EmployeeData) -> DriverResult<Employee> {
        validate_required(&data)?;

        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;
        let id = match db::create_employee(tx.ex(), &data, now).await {
            Ok(id) => id,
            Err(DbError::AlreadyExists) => {
                return Err(DriverError::AlreadyExists(DUPLICATE_EMAIL_MESSAGE.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        let employee = match db::get_employee(tx.ex(), id).await? {
            Some(employee) => employee,
            None => {
                return Err(DriverError::BackendError(
                    "Insert did not persist the new employee".to_owned(),
                ));
            }
        };
        tx.commit().await?;
        Ok(employee)
    }

    /// Replaces the fields of the employee `id` with `data` and returns the row as re-read from
    /// the store.
    ///
    /// The target is identified by `id` alone; the store, not the input, is the source of truth
    /// for what is returned.
    pub(crate) async fn update_employee(
        self,
        id: i64,
        data: EmployeeData,
    ) -> DriverResult<Employee> {
        validate_required(&data)?;
        if data.hire_date.is_none() {
            return Err(DriverError::InvalidInput("A hire date is required".to_owned()));
        }

        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;
        if db::get_employee(tx.ex(), id).await?.is_none() {
            return Err(not_found(id));
        }
        match db::update_employee(tx.ex(), id, &data, now).await {
            Ok(_affected) => (),
            Err(DbError::AlreadyExists) => {
                return Err(DriverError::AlreadyExists(DUPLICATE_EMAIL_MESSAGE.to_owned()));
            }
            Err(e) => return Err(e.into()),
        }
        let employee = match db::get_employee(tx.ex(), id).await? {
            Some(employee) => employee,
            None => {
                return Err(DriverError::BackendError(
                    "Update did not persist the employee".to_owned(),
                ));
            }
        };
        tx.commit().await?;
        Ok(employee)
    }

    /// Deletes the employee with the given `id` and returns the number of deleted rows.
    pub(crate) async fn delete_employee(self, id: i64) -> DriverResult<u64> {
        if id <= 0 {
            return Err(DriverError::InvalidInput(
                "The id must be a positive integer".to_owned(),
            ));
        }

        let mut tx = self.db.begin().await?;
        if db::get_employee(tx.ex(), id).await?.is_none() {
            return Err(not_found(id));
        }
        let affected = db::delete_employee(tx.ex(), id).await?;
        tx.commit().await?;
        Ok(affected)
    }
}
