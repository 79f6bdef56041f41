//! Assigned items and distribution batches.

use crate::store::conversion_error;
use common::model::batch::DistributionBatch;
use common::model::contact::ContactRecord;
use common::model::item::{AssignedItem, ItemStatus};
use common::model::user::{Role, UserProfile, UserSummary};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Batch summary as written, before the uploader is resolved.
#[derive(Debug, Clone)]
pub struct NewBatch {
    pub batch_id: String,
    pub file_name: String,
    pub checksum: String,
    pub total_records: usize,
    pub distributed_records: usize,
    pub uploaded_by: String,
    pub created_at: String,
}

const ITEM_COLUMNS: &str =
    "i.id, i.first_name, i.phone, i.notes, i.agent_id, i.batch_id, i.status, i.created_at";

/// Maps the eight `ITEM_COLUMNS` starting at `offset`.
fn item_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<AssignedItem> {
    let first_name: String = row.get(offset + 1)?;
    let phone: String = row.get(offset + 2)?;
    let notes: String = row.get(offset + 3)?;
    let status: String = row.get(offset + 6)?;
    Ok(AssignedItem {
        id: row.get(offset)?,
        contact: ContactRecord::new(&first_name, &phone, Some(&notes))
            .map_err(|e| conversion_error(offset + 1, e))?,
        agent_id: row.get(offset + 4)?,
        batch_id: row.get(offset + 5)?,
        status: status
            .parse::<ItemStatus>()
            .map_err(|e| conversion_error(offset + 6, e))?,
        created_at: row.get(offset + 7)?,
    })
}

/// Writes the batch row and all of its items in one transaction.
pub fn save_distribution(
    conn: &mut Connection,
    batch: &NewBatch,
    items: &[AssignedItem],
) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO distributions
            (batch_id, file_name, checksum, total_records, distributed_records, uploaded_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            batch.batch_id,
            batch.file_name,
            batch.checksum,
            batch.total_records as i64,
            batch.distributed_records as i64,
            batch.uploaded_by,
            batch.created_at,
        ],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO list_items
                (id, first_name, phone, notes, agent_id, batch_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for item in items {
            stmt.execute(params![
                item.id,
                item.contact.first_name(),
                item.contact.phone(),
                item.contact.notes(),
                item.agent_id,
                item.batch_id,
                item.status.as_str(),
                item.created_at,
            ])?;
        }
    }
    tx.commit()
}

/// All batches, newest first, with the uploader resolved.
pub fn list_batches(conn: &Connection) -> rusqlite::Result<Vec<DistributionBatch>> {
    let mut stmt = conn.prepare(
        "SELECT d.batch_id, d.file_name, d.checksum, d.total_records, d.distributed_records,
                u.id, u.name, u.email, d.created_at
         FROM distributions d
         JOIN users u ON u.id = d.uploaded_by
         ORDER BY d.created_at DESC, d.rowid DESC",
    )?;
    let batches = stmt.query_map([], |row| {
        Ok(DistributionBatch {
            batch_id: row.get(0)?,
            file_name: row.get(1)?,
            checksum: row.get(2)?,
            total_records: row.get::<_, i64>(3)? as usize,
            distributed_records: row.get::<_, i64>(4)? as usize,
            uploaded_by: UserSummary {
                id: row.get(5)?,
                name: row.get(6)?,
                email: row.get(7)?,
            },
            created_at: row.get(8)?,
        })
    })?;
    batches.collect()
}

/// Items of one batch in insertion order, each paired with its agent.
///
/// Insertion order is distribution order, so items of the same agent are
/// contiguous. An unknown batch id yields an empty vector.
pub fn batch_items(
    conn: &Connection,
    batch_id: &str,
) -> rusqlite::Result<Vec<(UserProfile, AssignedItem)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT u.id, u.name, u.email, u.mobile, u.role, u.created_at, {}
         FROM list_items i
         JOIN users u ON u.id = i.agent_id
         WHERE i.batch_id = ?1
         ORDER BY i.rowid",
        ITEM_COLUMNS
    ))?;
    let rows = stmt.query_map(params![batch_id], |row| {
        let role: String = row.get(4)?;
        let agent = UserProfile {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            mobile: row.get(3)?,
            role: role.parse::<Role>().map_err(|e| conversion_error(4, e))?,
            created_at: row.get(5)?,
        };
        Ok((agent, item_from_row(row, 6)?))
    })?;
    rows.collect()
}

/// Items assigned to one agent, newest batch first.
pub fn items_for_agent(conn: &Connection, agent_id: &str) -> rusqlite::Result<Vec<AssignedItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM list_items i WHERE i.agent_id = ?1 ORDER BY i.created_at DESC, i.rowid",
        ITEM_COLUMNS
    ))?;
    let items = stmt.query_map(params![agent_id], |row| item_from_row(row, 0))?;
    items.collect()
}

/// The batch id with the largest `BATCH-<millis>` stamp, if any.
///
/// Stamps can run ahead of the wall clock, so this is not necessarily the
/// newest batch by `created_at`.
pub fn highest_batch_id(conn: &Connection) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT batch_id FROM distributions
         WHERE batch_id LIKE 'BATCH-%'
         ORDER BY CAST(substr(batch_id, 7) AS INTEGER) DESC
         LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()
}
