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

//! API to update one department.

use crate::driver::Driver;
use crate::model::{Department, DepartmentData};
use crate::rest::RestResult;
use axum::extract::{Path, State};
use axum::Json;

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<i64>,
    Json(request): Json<DepartmentData>,
) -> RestResult<Json<Department>> {
    let department = driver.update_department(id, request).await?;
    Ok(Json(department))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;

    fn route(id: i64) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/departments/{}", id))
    }

    #[tokio::test]
    async fn test_update_ok() {
        let context = TestContext::setup().await;

        let id = context.insert_department("Finance", "5F").await;

        let request = DepartmentData { name: "Sales".to_owned(), location: "10F".to_owned() };
        let response = OneShotBuilder::new(context.app(), route(id))
            .send_json(request)
            .await
            .expect_json::<Department>()
            .await;

        assert_eq!(id, *response.id());
        assert_eq!("Sales", response.name());
        assert_eq!("10F", response.location());

        let stored = context.get_department(id).await.unwrap();
        assert_eq!(stored, response);
    }

    #[tokio::test]
    async fn test_update_ignores_id_in_payload() {
        let context = TestContext::setup().await;

        let id = context.insert_department("Finance", "5F").await;

        let request = serde_json::json!({"id": 876, "name": "Sales", "location": "10F"});
        let response = OneShotBuilder::new(context.app(), route(id))
            .send_json(request)
            .await
            .expect_json::<Department>()
            .await;

        // The path, not the payload, decides which row is written.
        assert_eq!(id, *response.id());
        assert!(context.get_department(876).await.is_none());
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let context = TestContext::setup().await;

        let request = DepartmentData { name: "Sales".to_owned(), location: "10F".to_owned() };
        OneShotBuilder::new(context.app(), route(123))
            .send_json(request)
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_text("No department found with id 123")
            .await;

        assert_eq!(0, context.count_departments().await);
    }

    #[tokio::test]
    async fn test_update_blank_name_leaves_row_alone() {
        let context = TestContext::setup().await;

        let id = context.insert_department("Finance", "5F").await;

        let request = DepartmentData { name: "".to_owned(), location: "10F".to_owned() };
        OneShotBuilder::new(context.app(), route(id))
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_text("name cannot be empty")
            .await;

        let stored = context.get_department(id).await.unwrap();
        assert_eq!("Finance", stored.name());
        assert_eq!("5F", stored.location());
    }
}
