use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::store::{lists, Store};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::responses::MyItems;

/// Handler for `GET /api/lists/agent/my-lists`.
///
/// Only items assigned to the caller are returned, whatever their role.
pub async fn process(identity: Identity, state: web::Data<AppState>) -> impl Responder {
    match my_items(&state.store, identity.user_id()) {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => e.error_response(),
    }
}

pub fn my_items(store: &Store, user_id: &str) -> ApiResult<MyItems> {
    let conn = store.connect()?;
    let items = lists::items_for_agent(&conn, user_id)?;
    Ok(MyItems {
        total_items: items.len(),
        items,
    })
}
