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

//! Database queries to manipulate employees.
//!
//! The `employees.email` column carries a unique constraint which these functions do not
//! pre-check: a violation comes back from the store as `DbError::AlreadyExists` and the upper
//! layers translate it into their duplicate-email representations.

use crate::db::sqlite::{build_date, build_timestamp, unpack_date, unpack_timestamp};
use crate::db::{postgres, sqlite, DbError, DbResult, Executor};
use crate::model::{Employee, EmployeeData};
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::{Date, OffsetDateTime};

impl TryFrom<PgRow> for Employee {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(postgres::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let department_id: i64 =
            row.try_get("department_id").map_err(postgres::map_sqlx_error)?;
        let position: String = row.try_get("position").map_err(postgres::map_sqlx_error)?;
        let hire_date: Option<Date> =
            row.try_get("hire_date").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at: OffsetDateTime =
            row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        Ok(Employee::new(
            id, last_name, first_name, email, department_id, position, hire_date, created_at,
            updated_at,
        ))
    }
}

impl TryFrom<SqliteRow> for Employee {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let department_id: i64 = row.try_get("department_id").map_err(sqlite::map_sqlx_error)?;
        let position: String = row.try_get("position").map_err(sqlite::map_sqlx_error)?;
        let hire_date: Option<String> =
            row.try_get("hire_date").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 =
            row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_secs: i64 =
            row.try_get("updated_at_secs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsecs: i64 =
            row.try_get("updated_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        let hire_date = match hire_date {
            None => None,
            Some(text) => Some(build_date(&text)?),
        };
        let created_at = build_timestamp(created_at_secs, created_at_nsecs)?;
        let updated_at = build_timestamp(updated_at_secs, updated_at_nsecs)?;

        Ok(Employee::new(
            id, last_name, first_name, email, department_id, position, hire_date, created_at,
            updated_at,
        ))
    }
}

/// Gets all employees in key order.
pub(crate) async fn list_employees(ex: &mut Executor) -> DbResult<Vec<Employee>> {
    let mut employees = vec![];
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, last_name, first_name, email, department_id, position, hire_date,
                    created_at, updated_at
                FROM employees ORDER BY id";
            let rows = sqlx::query(query_str)
                .fetch_all(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            for row in rows {
                employees.push(Employee::try_from(row)?);
            }
        }

        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, last_name, first_name, email, department_id, position, hire_date,
                    created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs
                FROM employees ORDER BY id";
            let rows =
                sqlx::query(query_str).fetch_all(ex).await.map_err(sqlite::map_sqlx_error)?;
            for row in rows {
                employees.push(Employee::try_from(row)?);
            }
        }
    }
    Ok(employees)
}

/// Gets the employee with the given `id`, or `None` if it does not exist.
pub(crate) async fn get_employee(ex: &mut Executor, id: i64) -> DbResult<Option<Employee>> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, last_name, first_name, email, department_id, position, hire_date,
                    created_at, updated_at
                FROM employees WHERE id = $1";
            let maybe_row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            match maybe_row {
                None => Ok(None),
                Some(row) => Ok(Some(Employee::try_from(row)?)),
            }
        }

        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, last_name, first_name, email, department_id, position, hire_date,
                    created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs
                FROM employees WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match maybe_row {
                None => Ok(None),
                Some(row) => Ok(Some(Employee::try_from(row)?)),
            }
        }
    }
}

/// Creates a new employee from `data` and returns its store-assigned key.
///
/// The employee's email and referenced department are validated by the store's constraints, not
/// here, which keeps the check-then-act race out of this layer.
pub(crate) async fn create_employee(
    ex: &mut Executor,
    data: &EmployeeData,
    now: OffsetDateTime,
) -> DbResult<i64> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO employees
                    (last_name, first_name, email, department_id, position, hire_date,
                     created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(&data.last_name)
                .bind(&data.first_name)
                .bind(data.email.as_deref())
                .bind(data.department_id)
                .bind(data.position.as_deref())
                .bind(data.hire_date)
                .bind(now)
                .bind(now)
                .fetch_one(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)
        }

        Executor::Sqlite(ex) => {
            let (now_secs, now_nsecs) = unpack_timestamp(now);

            let query_str = "
                INSERT INTO employees
                    (last_name, first_name, email, department_id, position, hire_date,
                     created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(&data.last_name)
                .bind(&data.first_name)
                .bind(data.email.as_deref())
                .bind(data.department_id)
                .bind(data.position.as_deref())
                .bind(data.hire_date.map(unpack_date))
                .bind(now_secs)
                .bind(now_nsecs)
                .bind(now_secs)
                .bind(now_nsecs)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError(
                    "Insertion affected more than one row".to_owned(),
                ));
            }
            Ok(done.last_insert_rowid())
        }
    }
}

/// Replaces the mutable fields of the employee `id` with `data`, refreshing its update time, and
/// returns the number of affected rows.
pub(crate) async fn update_employee(
    ex: &mut Executor,
    id: i64,
    data: &EmployeeData,
    now: OffsetDateTime,
) -> DbResult<u64> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE employees
                SET last_name = $1, first_name = $2, email = $3, department_id = $4,
                    position = $5, hire_date = $6, updated_at = $7
                WHERE id = $8";
            let done = sqlx::query(query_str)
                .bind(&data.last_name)
                .bind(&data.first_name)
                .bind(data.email.as_deref())
                .bind(data.department_id)
                .bind(data.position.as_deref())
                .bind(data.hire_date)
                .bind(now)
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        Executor::Sqlite(ex) => {
            let (now_secs, now_nsecs) = unpack_timestamp(now);

            let query_str = "
                UPDATE employees
                SET last_name = ?, first_name = ?, email = ?, department_id = ?,
                    position = ?, hire_date = ?, updated_at_secs = ?, updated_at_nsecs = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(&data.last_name)
                .bind(&data.first_name)
                .bind(data.email.as_deref())
                .bind(data.department_id)
                .bind(data.position.as_deref())
                .bind(data.hire_date.map(unpack_date))
                .bind(now_secs)
                .bind(now_nsecs)
                .bind(id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }
    }
}

/// Deletes the employee with the given `id` and returns the number of affected rows.
pub(crate) async fn delete_employee(ex: &mut Executor, id: i64) -> DbResult<u64> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM employees WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM employees WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }
    }
}
