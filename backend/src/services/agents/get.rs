//! Single agent lookup for `GET /api/agents/{agent_id}`.

use crate::auth::AdminIdentity;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::{users, Store};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::user::UserProfile;

/// Actix web handler for `GET /api/agents/{agent_id}`.
///
/// # Arguments
/// * `agent_id` - The agent's identifier, extracted from the URL path.
///
/// # Returns
/// - `200 OK` with the agent's profile.
/// - `404 Not Found` when no agent has that id (administrators are not agents).
pub async fn process(
    _admin: AdminIdentity,
    agent_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    match get_agent(&state.store, &agent_id) {
        Ok(agent) => HttpResponse::Ok().json(agent),
        Err(e) => e.error_response(),
    }
}

fn get_agent(store: &Store, agent_id: &str) -> ApiResult<UserProfile> {
    let conn = store.connect()?;
    users::find_agent(&conn, agent_id)?.ok_or_else(|| ApiError::NotFound("Agent not found".to_string()))
}
