use rusqlite::{params, Connection, OptionalExtension};

pub fn insert(conn: &Connection, token: &str, user_id: &str, created_at: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![token, user_id, created_at],
    )?;
    Ok(())
}

/// Returns `(user_id, created_at)` for a token.
pub fn find(conn: &Connection, token: &str) -> rusqlite::Result<Option<(String, String)>> {
    conn.query_row(
        "SELECT user_id, created_at FROM sessions WHERE token = ?1",
        params![token],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

pub fn delete(conn: &Connection, token: &str) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}
