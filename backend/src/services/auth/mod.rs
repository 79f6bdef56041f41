//! Sign-in endpoints.
//!
//! - `POST /api/auth/login`: exchange email and password for a bearer token.
//! - `GET /api/auth/profile`: the signed-in user's profile.
//! - `POST /api/auth/logout`: revoke the presented token.

mod login;

use crate::auth::Identity;
use crate::error::ResponseResult;
use crate::state::AppState;
use crate::store::sessions;
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use common::responses::MessageResponse;

const API_PATH: &str = "/api/auth";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/login", post().to(login::process))
        .route("/profile", get().to(profile))
        .route("/logout", post().to(logout))
}

async fn profile(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(identity.profile)
}

async fn logout(identity: Identity, state: web::Data<AppState>) -> ResponseResult {
    let conn = state.store.connect()?;
    sessions::delete(&conn, &identity.token)?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
