use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::{sessions, users};
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use common::model::user::{Role, UserProfile};
use futures_util::future::{ready, Ready};
use log::debug;
use rusqlite::Connection;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";
pub const NOT_ADMIN: &str = "Not authorized as an admin";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Identity {
    pub profile: UserProfile,
    pub token: String,
}

impl Identity {
    pub fn user_id(&self) -> &str {
        &self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.role == Role::Admin
    }
}

/// An authenticated caller with the `admin` role.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl FromRequest for Identity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for AdminIdentity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|identity| {
            if identity.is_admin() {
                Ok(AdminIdentity(identity))
            } else {
                Err(ApiError::Forbidden(NOT_ADMIN.to_string()))
            }
        }))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn authenticate(req: &HttpRequest) -> ApiResult<Identity> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state is not configured".to_string()))?;
    let token = bearer_token(req).ok_or_else(|| ApiError::Unauthorized(NO_TOKEN.to_string()))?;
    let conn = state.store.connect()?;
    resolve_session(&conn, &token, state.config.session_ttl_hours, Utc::now())
}

/// Looks up a session token and the user behind it.
///
/// Expired sessions are deleted on sight.
pub fn resolve_session(
    conn: &Connection,
    token: &str,
    ttl_hours: i64,
    now: DateTime<Utc>,
) -> ApiResult<Identity> {
    let failed = || ApiError::Unauthorized(TOKEN_FAILED.to_string());

    let (user_id, created_at) = sessions::find(conn, token)?.ok_or_else(failed)?;
    if is_expired(&created_at, ttl_hours, now) {
        debug!("session for user {} expired", user_id);
        sessions::delete(conn, token)?;
        return Err(failed());
    }

    let user = users::find_by_id(conn, &user_id)?.ok_or_else(failed)?;
    Ok(Identity {
        profile: user.profile,
        token: token.to_string(),
    })
}

fn is_expired(created_at: &str, ttl_hours: i64, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(issued) => match Duration::try_hours(ttl_hours) {
            Some(ttl) => now.signed_duration_since(issued.with_timezone(&Utc)) > ttl,
            None => true,
        },
        Err(_) => true,
    }
}
