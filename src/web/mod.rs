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

//! Entry point to the form-based web interface.
//!
//! The handlers in this layer map driver outcomes to rendered pages and redirects:
//! successful mutations redirect to the list views, validation problems re-render the
//! submitted form with errors attached, and failed deletions redirect back to the list
//! with a marker in the query string.  Browsers only submit GET and POST, so mutations
//! are plain POST routes instead of PUT/DELETE ones.

use crate::driver::Driver;
use axum::response::Html;
use axum::Router;

mod departments;
mod employees;
mod render;
#[cfg(test)]
mod testutils;

/// GET handler for the home page.
async fn home() -> Html<String> {
    render::home_page()
}

/// Creates the router for the web interface.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post};
    Router::new()
        .route("/", get(home))
        .route("/web", get(home))
        .route("/web/departments", get(departments::list).post(departments::create))
        .route("/web/departments/new", get(departments::new_form))
        .route("/web/departments/edit/:id", get(departments::edit_form))
        .route("/web/departments/update/:id", post(departments::update))
        .route("/web/departments/delete/:id", post(departments::delete))
        .route("/web/employees", get(employees::list).post(employees::create))
        .route("/web/employees/new", get(employees::new_form))
        .route("/web/employees/edit/:id", get(employees::edit_form))
        .route("/web/employees/update/:id", post(employees::update))
        .route("/web/employees/delete/:id", post(employees::delete))
        .with_state(driver)
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use crate::rest::testutils::OneShotBuilder;
    use axum::http;

    #[tokio::test]
    async fn test_home_links_to_the_lists() {
        let context = TestContext::setup().await;

        for uri in ["/", "/web"] {
            let body = OneShotBuilder::new(context.app(), (http::Method::GET, uri))
                .send_empty()
                .await
                .take_body_as_text()
                .await;
            assert!(body.contains("/web/departments"));
            assert!(body.contains("/web/employees"));
        }
    }
}
