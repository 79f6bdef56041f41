use rusqlite::Connection;

/// Creates all tables if they don't exist.
///
/// The CHECK constraints mirror the `Role` and `ItemStatus` value objects.
pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            mobile TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('admin', 'agent')),
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS distributions (
            batch_id TEXT PRIMARY KEY NOT NULL,
            file_name TEXT NOT NULL,
            checksum TEXT NOT NULL,
            total_records INTEGER NOT NULL,
            distributed_records INTEGER NOT NULL,
            uploaded_by TEXT NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS list_items (
            id TEXT PRIMARY KEY NOT NULL,
            first_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            agent_id TEXT NOT NULL REFERENCES users(id),
            batch_id TEXT NOT NULL REFERENCES distributions(batch_id),
            status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'completed')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_list_items_batch ON list_items(batch_id);
        CREATE INDEX IF NOT EXISTS idx_list_items_agent ON list_items(agent_id);
        ",
    )
}
