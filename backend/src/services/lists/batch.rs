//! `GET /api/lists/batch/{batch_id}`: the items of one batch grouped by agent.
//!
//! An unknown batch id is not an error. It answers `200 OK` with no items and
//! no groups, the same as a batch that happened to be empty.

use crate::auth::AdminIdentity;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::store::{lists, Store};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::batch::{AgentGroup, BatchDetail};
use common::model::item::AssignedItem;
use common::model::user::UserProfile;
use std::collections::HashMap;

/// Actix web handler for `GET /api/lists/batch/{batch_id}`.
///
/// # Arguments
/// * `batch_id` - The batch identifier, extracted from the URL path.
///
/// # Returns
/// - `200 OK` with every item of the batch and the same items grouped by agent.
pub async fn process(
    _admin: AdminIdentity,
    batch_id: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    match batch_detail(&state.store, &batch_id) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) => e.error_response(),
    }
}

pub fn batch_detail(store: &Store, batch_id: &str) -> ApiResult<BatchDetail> {
    let conn = store.connect()?;
    let rows = lists::batch_items(&conn, batch_id)?;
    Ok(group_by_agent(batch_id, rows))
}

/// Groups items by agent. Groups appear in the order their agent is first
/// seen, which for stored batches is distribution order.
pub fn group_by_agent(batch_id: &str, rows: Vec<(UserProfile, AssignedItem)>) -> BatchDetail {
    let mut groups: Vec<AgentGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut items = Vec::with_capacity(rows.len());

    for (agent, item) in rows {
        let idx = *positions.entry(agent.id.clone()).or_insert_with(|| {
            groups.push(AgentGroup {
                agent,
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].items.push(item.clone());
        items.push(item);
    }

    BatchDetail {
        batch_id: batch_id.to_string(),
        total_items: items.len(),
        items,
        grouped_by_agent: groups,
    }
}
