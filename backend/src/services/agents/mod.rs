//! Agent account management (admin only).
//!
//! - `POST /api/agents`: create an agent.
//! - `GET /api/agents`: all agents, newest first.
//! - `GET /api/agents/{agent_id}`: one agent.

mod create;
mod get;
mod list;

pub use create::create_agent;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/agents";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/{agent_id}", get().to(get::process))
}
