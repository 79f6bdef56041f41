//! # Agent Creation Service
//!
//! Backend logic for `POST /api/agents`.
//!
//! ## Workflow
//!
//! 1.  **Field checks**: name, email, mobile and password are checked together and every
//!     failure is reported in one `400` response.
//!
//! 2.  **Uniqueness**: the email is trimmed, lowercased and looked up. A taken email is a
//!     validation error, including when a concurrent request wins the insert.
//!
//! 3.  **Insert**: the password is hashed with a fresh salt and the agent row is written.

use crate::auth::password::{hash_password, new_salt};
use crate::auth::AdminIdentity;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::users::{self, StoredUser};
use crate::store::now_timestamp;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::user::{Role, UserProfile};
use common::requests::CreateAgentRequest;
use common::responses::{AgentCreated, FieldError};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, ErrorCode};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const AGENT_EXISTS: &str = "Agent already exists with this email";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Actix web handler for `POST /api/agents`.
///
/// # Arguments
/// * `_admin` - The signed-in administrator; other callers are refused before this runs.
/// * `payload` - The JSON `CreateAgentRequest` body.
///
/// # Returns
/// - `201 Created` with the new agent's profile and a confirmation message.
/// - `400 Bad Request` listing every invalid field, or when the email is taken.
/// - `500 Internal Server Error` if the database cannot be reached.
pub async fn process(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    payload: web::Json<CreateAgentRequest>,
) -> impl Responder {
    let result = state
        .store
        .connect()
        .map_err(ApiError::from)
        .and_then(|conn| create_agent(&conn, &payload));
    match result {
        Ok(agent) => HttpResponse::Created().json(AgentCreated {
            agent,
            message: "Agent created successfully".to_string(),
        }),
        Err(e) => e.error_response(),
    }
}

fn check_fields(req: &CreateAgentRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut fail = |field: &str, message: &str| {
        errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        })
    };

    if req.name.trim().is_empty() {
        fail("name", "Name is required");
    }
    if !EMAIL_RE.is_match(req.email.trim()) {
        fail("email", "Please enter a valid email");
    }
    if req.mobile.trim().is_empty() {
        fail("mobile", "Mobile number is required");
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        fail("password", "Password must be at least 6 characters");
    }
    errors
}

/// Validates the request and inserts a new agent.
///
/// Emails are stored trimmed and lowercased and must be unused.
pub fn create_agent(conn: &Connection, req: &CreateAgentRequest) -> ApiResult<UserProfile> {
    let fields = check_fields(req);
    if !fields.is_empty() {
        return Err(ApiError::Validation {
            message: "Validation failed".to_string(),
            fields,
        });
    }

    let email = req.email.trim().to_lowercase();
    if users::find_by_email(conn, &email)?.is_some() {
        return Err(ApiError::validation(AGENT_EXISTS));
    }

    let salt = new_salt();
    let user = StoredUser {
        profile: UserProfile {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            email,
            mobile: req.mobile.trim().to_string(),
            role: Role::Agent,
            created_at: now_timestamp(),
        },
        password_hash: hash_password(&req.password, &salt),
        password_salt: salt,
    };

    match users::insert(conn, &user) {
        Ok(()) => {}
        // Lost a race with a concurrent request for the same email.
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return Err(ApiError::validation(AGENT_EXISTS));
        }
        Err(e) => return Err(e.into()),
    }

    info!("agent {} created ({})", user.profile.id, user.profile.email);
    Ok(user.profile)
}
