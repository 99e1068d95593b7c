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

//! Entry point to the JSON REST interface.
//!
//! Every API is put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This may
//! seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API defines a `route` method that returns the
//! HTTP method and the API path under test.  All integration tests within the module then rely
//! on `route` to obtain this information, ensuring that they all test the desired API.

use crate::driver::{Driver, DriverError};
use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::response::IntoResponse;
use axum::Router;
use log::error;

mod department_delete;
mod department_get;
mod department_put;
mod departments_get;
mod departments_post;
mod employee_delete;
mod employee_get;
mod employee_put;
mod employees_get;
mod employees_post;
#[cfg(test)]
pub(crate) mod testutils;

/// Message returned to clients in place of the details of an internal error.
const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred on the server";

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
///
/// Error responses carry plain text bodies: this interface predates any structured error schema
/// and its clients parse the messages as text.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum RestError {
    /// Indicates that a request conflicts with state that already exists.
    #[error("{0}")]
    Conflict(String),

    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::Conflict(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            RestError::Conflict(message) => (http::StatusCode::CONFLICT, message),
            RestError::InternalError(message) => {
                // The details of unexpected errors must never reach the caller.
                error!("Internal error in request: {}", message);
                (http::StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_owned())
            }
            RestError::InvalidRequest(message) => (http::StatusCode::BAD_REQUEST, message),
            RestError::NotFound(message) => (http::StatusCode::NOT_FOUND, message),
            RestError::PayloadNotEmpty => {
                (http::StatusCode::PAYLOAD_TOO_LARGE, "Content should be empty".to_owned())
            }
        };

        (status, message).into_response()
    }
}

/// Result type for this module.
pub(crate) type RestResult<T> = Result<T, RestError>;

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub(crate) struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Creates the router for the REST interface.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    Router::new()
        .route(
            "/api/departments",
            get(departments_get::handler).post(departments_post::handler),
        )
        .route(
            "/api/departments/:id",
            get(department_get::handler)
                .put(department_put::handler)
                .delete(department_delete::handler),
        )
        .route("/api/employees", get(employees_get::handler).post(employees_post::handler))
        .route(
            "/api/employees/:id",
            get(employee_get::handler)
                .put(employee_put::handler)
                .delete(employee_delete::handler),
        )
        .with_state(driver)
}
