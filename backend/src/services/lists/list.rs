use crate::auth::AdminIdentity;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::store::{lists, Store};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::responses::DistributionList;

/// Actix web handler for `GET /api/lists`.
///
/// # Returns
/// - `200 OK` with `{ distributions, count }`, newest batch first, each with its
///   uploader's id, name and email.
pub async fn process(_admin: AdminIdentity, state: web::Data<AppState>) -> impl Responder {
    match list_distributions(&state.store) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => e.error_response(),
    }
}

pub fn list_distributions(store: &Store) -> ApiResult<DistributionList> {
    let conn = store.connect()?;
    let distributions = lists::list_batches(&conn)?;
    Ok(DistributionList {
        count: distributions.len(),
        distributions,
    })
}
