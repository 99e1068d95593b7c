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

//! API to delete one employee.

use crate::driver::Driver;
use crate::rest::{EmptyBody, RestResult};
use axum::extract::{Path, State};
use axum::http;

/// DELETE handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<i64>,
    _: EmptyBody,
) -> RestResult<http::StatusCode> {
    driver.delete_employee(id).await?;
    Ok(http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;

    fn route(id: i64) -> (http::Method, String) {
        (http::Method::DELETE, format!("/api/employees/{}", id))
    }

    #[tokio::test]
    async fn test_delete_ok() {
        let context = TestContext::setup().await;

        let department_id = context.insert_department("Finance", "5F").await;
        let id = context.insert_employee(&employee_data("sato@example.com", department_id)).await;

        OneShotBuilder::new(context.app(), route(id))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        assert!(context.get_employee(id).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route(99))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_text("No employee found with id 99")
            .await;
    }

    #[tokio::test]
    async fn test_delete_non_positive_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route(-5))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_text("positive integer")
            .await;
    }
}
