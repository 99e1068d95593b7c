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

//! Operations on departments.

use crate::db::departments as db;
use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::{Department, DepartmentData};

/// Converts the first field violation in `data`, if any, into an `InvalidInput` error.
fn validate(data: &DepartmentData) -> DriverResult<()> {
    match data.validate().into_iter().next() {
        Some(violation) => Err(DriverError::InvalidInput(violation.message)),
        None => Ok(()),
    }
}

/// Builds the error that reports the absence of the department `id`.
fn not_found(id: i64) -> DriverError {
    DriverError::NotFound(format!("No department found with id {}", id))
}

impl Driver {
    /// Gets all departments.
    pub(crate) async fn get_departments(self) -> DriverResult<Vec<Department>> {
        let departments = db::list_departments(&mut self.db.ex().await?).await?;
        Ok(departments)
    }

    /// Gets the department with the given `id`.
    pub(crate) async fn get_department(self, id: i64) -> DriverResult<Department> {
        match db::get_department(&mut self.db.ex().await?, id).await? {
            Some(department) => Ok(department),
            None => Err(not_found(id)),
        }
    }

    /// Creates a new department from `data` and returns it as re-read from the store.
    pub(crate) async fn create_department(self, data: DepartmentData) -> DriverResult<Department> {
        validate(&data)?;

        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;
        let id = db::create_department(tx.ex(), &data, now).await?;
        let department = match db::get_department(tx.ex(), id).await? {
            Some(department) => department,
            None => {
                return Err(DriverError::BackendError(
                    "Insert did not persist the new department".to_owned(),
                ));
            }
        };
        tx.commit().await?;
        Ok(department)
    }

    /// Replaces the fields of the department `id` with `data` and returns the row as re-read
    /// from the store.
    ///
    /// The target is identified by `id` alone; the store, not the input, is the source of truth
    /// for what is returned.
    pub(crate) async fn update_department(
        self,
        id: i64,
        data: DepartmentData,
    ) -> DriverResult<Department> {
        validate(&data)?;

        let now = self.clock.now_utc();
        let mut tx = self.db.begin().await?;
        if db::get_department(tx.ex(), id).await?.is_none() {
            return Err(not_found(id));
        }
        db::update_department(tx.ex(), id, &data, now).await?;
        let department = match db::get_department(tx.ex(), id).await? {
            Some(department) => department,
            None => {
                return Err(DriverError::BackendError(
                    "Update did not persist the department".to_owned(),
                ));
            }
        };
        tx.commit().await?;
        Ok(department)
    }

    /// Deletes the department with the given `id` and returns the number of deleted rows.
    pub(crate) async fn delete_department(self, id: i64) -> DriverResult<u64> {
        if id <= 0 {
            return Err(DriverError::InvalidInput(
                "The id must be a positive integer".to_owned(),
            ));
        }

        let mut tx = self.db.begin().await?;
        if db::get_department(tx.ex(), id).await?.is_none() {
            return Err(not_found(id));
        }
        let affected = db::delete_department(tx.ex(), id).await?;
        tx.commit().await?;
        Ok(affected)
    }
}
