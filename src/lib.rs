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

//! HR record manager exposing department and employee CRUD over a JSON REST
//! API and a server-rendered form interface.
//!
//! The code follows a layered architecture and the modules mirror the layers:
//!
//! 1.  `model`: High-level data types representing concepts in the domain,
//!     plus the pure validators that check caller-supplied data.
//!
//! 1.  `db`: The persistence layer.  Provides a generic abstraction over the
//!     PostgreSQL (production) and SQLite (tests) backends and the
//!     per-entity query functions.
//!
//! 1.  `driver`: The business logic layer.  The `Driver` type coordinates
//!     validation, existence checks and database access, and yields typed
//!     errors that the presentation layers map to their own protocols.
//!
//! 1.  `rest`: The JSON REST interface under `/api`.
//!
//! 1.  `web`: The form-based web interface under `/web`, rendered
//!     server-side with a trivial template engine.
//!
//! 1.  `main`: The app launcher, which gathers configuration data from
//!     environment variables and calls `serve`.
//!
//! There are result and error types in every layer, such as `DbResult` and
//! `DbError`.  Errors float to the top of the app using the `?` operator and
//! are translated to protocol responses once they reach `rest` or `web`.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use crate::clocks::Clock;
use crate::db::Db;
use crate::driver::Driver;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod clocks;
pub mod db;
mod driver;
pub mod env;
pub(crate) mod model;
mod rest;
mod template;
mod web;

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let driver = Driver::new(db, clock);
    let app = rest::app(driver.clone()).merge(web::app(driver));

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
