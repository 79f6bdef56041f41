use crate::auth::password::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::{now_timestamp, sessions, users};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::LoginRequest;
use common::responses::{FieldError, LoginResponse};
use log::info;
use rusqlite::Connection;
use uuid::Uuid;

pub const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Actix web handler for `POST /api/auth/login`.
///
/// # Arguments
/// * `payload` - The JSON `LoginRequest` body.
///
/// # Returns
/// - `200 OK` with a bearer token and the user's profile.
/// - `400 Bad Request` when the email or password is blank.
/// - `401 Unauthorized` when the credentials don't match.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> impl Responder {
    let result = state
        .store
        .connect()
        .map_err(ApiError::from)
        .and_then(|conn| login(&conn, &payload));
    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.error_response(),
    }
}

/// Checks the credentials and opens a new session.
pub fn login(conn: &Connection, req: &LoginRequest) -> ApiResult<LoginResponse> {
    let mut fields = Vec::new();
    if req.email.trim().is_empty() {
        fields.push(FieldError {
            field: "email".to_string(),
            message: "Email is required".to_string(),
        });
    }
    if req.password.is_empty() {
        fields.push(FieldError {
            field: "password".to_string(),
            message: "Password is required".to_string(),
        });
    }
    if !fields.is_empty() {
        return Err(ApiError::Validation {
            message: "Validation failed".to_string(),
            fields,
        });
    }

    let rejected = || ApiError::Unauthorized(BAD_CREDENTIALS.to_string());
    let user = users::find_by_email(conn, req.email.trim())?.ok_or_else(rejected)?;
    if !verify_password(&req.password, &user.password_salt, &user.password_hash) {
        return Err(rejected());
    }

    let token = Uuid::new_v4().simple().to_string();
    sessions::insert(conn, &token, &user.profile.id, &now_timestamp())?;
    info!("user {} signed in", user.profile.email);

    Ok(LoginResponse {
        token,
        user: user.profile,
    })
}
