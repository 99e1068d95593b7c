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

//! Database queries to manipulate departments.

use crate::db::sqlite::{build_timestamp, unpack_timestamp};
use crate::db::{postgres, sqlite, DbError, DbResult, Executor};
use crate::model::{Department, DepartmentData};
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::OffsetDateTime;

impl TryFrom<PgRow> for Department {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let location: String = row.try_get("location").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at: OffsetDateTime =
            row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        Ok(Department::new(id, name, location, created_at, updated_at))
    }
}

impl TryFrom<SqliteRow> for Department {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let location: String = row.try_get("location").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 =
            row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_secs: i64 =
            row.try_get("updated_at_secs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsecs: i64 =
            row.try_get("updated_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        let created_at = build_timestamp(created_at_secs, created_at_nsecs)?;
        let updated_at = build_timestamp(updated_at_secs, updated_at_nsecs)?;

        Ok(Department::new(id, name, location, created_at, updated_at))
    }
}

/// Gets all departments in key order.
pub(crate) async fn list_departments(ex: &mut Executor) -> DbResult<Vec<Department>> {
    let mut departments = vec![];
    match ex {
        Executor::Postgres(ex) => {
            let query_str =
                "SELECT id, name, location, created_at, updated_at FROM departments ORDER BY id";
            let rows = sqlx::query(query_str)
                .fetch_all(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            for row in rows {
                departments.push(Department::try_from(row)?);
            }
        }

        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, name, location,
                    created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs
                FROM departments ORDER BY id";
            let rows =
                sqlx::query(query_str).fetch_all(ex).await.map_err(sqlite::map_sqlx_error)?;
            for row in rows {
                departments.push(Department::try_from(row)?);
            }
        }
    }
    Ok(departments)
}

/// Gets the department with the given `id`, or `None` if it does not exist.
pub(crate) async fn get_department(ex: &mut Executor, id: i64) -> DbResult<Option<Department>> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str =
                "SELECT id, name, location, created_at, updated_at FROM departments WHERE id = $1";
            let maybe_row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            match maybe_row {
                None => Ok(None),
                Some(row) => Ok(Some(Department::try_from(row)?)),
            }
        }

        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, name, location,
                    created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs
                FROM departments WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match maybe_row {
                None => Ok(None),
                Some(row) => Ok(Some(Department::try_from(row)?)),
            }
        }
    }
}

/// Creates a new department from `data` and returns its store-assigned key.
pub(crate) async fn create_department(
    ex: &mut Executor,
    data: &DepartmentData,
    now: OffsetDateTime,
) -> DbResult<i64> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO departments (name, location, created_at, updated_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(&data.name)
                .bind(&data.location)
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
                INSERT INTO departments
                    (name, location,
                     created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs)
                VALUES (?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(&data.name)
                .bind(&data.location)
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

/// Replaces the mutable fields of the department `id` with `data`, refreshing its update time,
/// and returns the number of affected rows.
pub(crate) async fn update_department(
    ex: &mut Executor,
    id: i64,
    data: &DepartmentData,
    now: OffsetDateTime,
) -> DbResult<u64> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str =
                "UPDATE departments SET name = $1, location = $2, updated_at = $3 WHERE id = $4";
            let done = sqlx::query(query_str)
                .bind(&data.name)
                .bind(&data.location)
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
                UPDATE departments
                SET name = ?, location = ?, updated_at_secs = ?, updated_at_nsecs = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(&data.name)
                .bind(&data.location)
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

/// Deletes the department with the given `id` and returns the number of affected rows.
pub(crate) async fn delete_department(ex: &mut Executor, id: i64) -> DbResult<u64> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM departments WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM departments WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }
    }
}
