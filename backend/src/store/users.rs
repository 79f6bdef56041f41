use crate::store::conversion_error;
use common::model::user::{Role, UserProfile};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// A user row including its credential columns.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub profile: UserProfile,
    pub password_hash: String,
    pub password_salt: String,
}

const USER_COLUMNS: &str =
    "id, name, email, mobile, role, created_at, password_hash, password_salt";

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let role: String = row.get(4)?;
    Ok(UserProfile {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        mobile: row.get(3)?,
        role: role.parse::<Role>().map_err(|e| conversion_error(4, e))?,
        created_at: row.get(5)?,
    })
}

fn stored_from_row(row: &Row<'_>) -> rusqlite::Result<StoredUser> {
    Ok(StoredUser {
        profile: profile_from_row(row)?,
        password_hash: row.get(6)?,
        password_salt: row.get(7)?,
    })
}

pub fn insert(conn: &Connection, user: &StoredUser) -> rusqlite::Result<()> {
    let p = &user.profile;
    conn.execute(
        "INSERT INTO users (id, name, email, mobile, role, created_at, password_hash, password_salt)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            p.id,
            p.name,
            p.email,
            p.mobile,
            p.role.as_str(),
            p.created_at,
            user.password_hash,
            user.password_salt,
        ],
    )?;
    Ok(())
}

/// Emails compare case-insensitively.
pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<StoredUser>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
        params![email],
        stored_from_row,
    )
    .optional()
}

pub fn find_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<StoredUser>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
        params![id],
        stored_from_row,
    )
    .optional()
}

pub fn find_agent(conn: &Connection, id: &str) -> rusqlite::Result<Option<UserProfile>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM users WHERE id = ?1 AND role = 'agent'",
            USER_COLUMNS
        ),
        params![id],
        profile_from_row,
    )
    .optional()
}

/// All agents, newest first.
pub fn list_agents(conn: &Connection) -> rusqlite::Result<Vec<UserProfile>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users WHERE role = 'agent' ORDER BY created_at DESC, rowid DESC",
        USER_COLUMNS
    ))?;
    let agents = stmt.query_map([], profile_from_row)?;
    agents.collect()
}

/// Agent ids in creation order. This order decides who receives the larger
/// share when records do not divide evenly.
pub fn agent_ids(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT id FROM users WHERE role = 'agent' ORDER BY created_at, rowid")?;
    let ids = stmt.query_map([], |row| row.get(0))?;
    ids.collect()
}
