//! Contact list distribution: upload, batch listing and per-agent views.
//!
//! The provided routes are:
//! - `POST /api/lists/upload` (admin): multipart upload of a CSV with
//!   `FirstName`, `Phone` and `Notes` columns. Valid rows are split across all
//!   agents and stored as a new batch.
//! - `GET /api/lists` (admin): every batch, newest first.
//! - `GET /api/lists/batch/{batch_id}` (admin): the items of a batch grouped
//!   by agent.
//! - `GET /api/lists/agent/my-lists` (any signed-in user): the caller's items.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod batch;
pub mod batch_id;
pub mod distribute;
mod list;
mod my_lists;
pub mod rows;
pub mod upload;
pub mod validate;

const API_PATH: &str = "/api/lists";

/// Configures and returns the Actix scope for list routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/upload", post().to(upload::process))
        .route("/batch/{batch_id}", get().to(batch::process))
        .route("/agent/my-lists", get().to(my_lists::process))
}
