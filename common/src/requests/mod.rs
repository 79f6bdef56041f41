use serde::Deserialize;

/// Request payload for `POST /api/auth/login`.
///
/// Missing fields deserialize as empty strings so the handler can report them
/// as field errors instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request payload for `POST /api/agents`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateAgentRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}
