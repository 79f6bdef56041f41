use crate::auth::AdminIdentity;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::store::{users, Store};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::responses::AgentList;

/// Actix web handler for `GET /api/agents`.
///
/// # Returns
/// - `200 OK` with `{ agents, count }`, newest agent first.
pub async fn process(_admin: AdminIdentity, state: web::Data<AppState>) -> impl Responder {
    match list_agents(&state.store) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => e.error_response(),
    }
}

fn list_agents(store: &Store) -> ApiResult<AgentList> {
    let conn = store.connect()?;
    let agents = users::list_agents(&conn)?;
    Ok(AgentList {
        count: agents.len(),
        agents,
    })
}
