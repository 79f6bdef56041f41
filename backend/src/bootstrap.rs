//! One-time startup work, run before the server binds.
//!
//! `prepare` creates the upload directory, applies the schema, makes sure the
//! default administrator exists and resumes the batch-id generator. Each step
//! is safe to repeat, so restarting the server never duplicates anything.

use crate::auth::password::{hash_password, new_salt};
use crate::config::{AdminSeed, AppConfig};
use crate::services::lists::batch_id::BatchIdGenerator;
use crate::state::AppState;
use crate::store::users::{self, StoredUser};
use crate::store::{lists, now_timestamp, Store};
use common::model::user::{Role, UserProfile};
use log::info;
use rusqlite::Connection;
use std::fs;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("cannot create upload directory: {0}")]
    UploadDir(#[from] std::io::Error),
    #[error("database initialization failed: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

pub fn prepare(config: &AppConfig) -> Result<AppState, BootstrapError> {
    fs::create_dir_all(&config.upload_dir)?;

    let store = Store::new(&config.database_path);
    store.initialize()?;

    let conn = store.connect()?;
    seed_admin(&conn, &config.admin)?;

    let highest = lists::highest_batch_id(&conn)?;
    let batch_ids = BatchIdGenerator::resume_after(highest.as_deref());

    info!("database ready at {}", store.path().display());
    Ok(AppState {
        store,
        config: Arc::new(config.clone()),
        batch_ids: Arc::new(batch_ids),
    })
}

/// Creates the default administrator unless a user with that email exists.
pub fn seed_admin(conn: &Connection, seed: &AdminSeed) -> rusqlite::Result<SeedOutcome> {
    let email = seed.email.trim().to_lowercase();
    if users::find_by_email(conn, &email)?.is_some() {
        info!("admin user already exists");
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let salt = new_salt();
    users::insert(
        conn,
        &StoredUser {
            profile: UserProfile {
                id: Uuid::new_v4().to_string(),
                name: seed.name.clone(),
                email: email.clone(),
                mobile: seed.mobile.clone(),
                role: Role::Admin,
                created_at: now_timestamp(),
            },
            password_hash: hash_password(&seed.password, &salt),
            password_salt: salt,
        },
    )?;
    info!("default admin user created: {}", email);
    Ok(SeedOutcome::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support;

    fn seed() -> AdminSeed {
        AdminSeed {
            name: "System Admin".into(),
            email: "Admin@Example.com".into(),
            mobile: "+1234567890".into(),
            password: "admin123".into(),
        }
    }

    #[test]
    fn seeding_twice_creates_one_admin() {
        let conn = test_support::connection();
        assert_eq!(seed_admin(&conn, &seed()).unwrap(), SeedOutcome::Created);
        assert_eq!(seed_admin(&conn, &seed()).unwrap(), SeedOutcome::AlreadyPresent);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users WHERE role = 'admin'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let admin = users::find_by_email(&conn, "admin@example.com").unwrap().unwrap();
        assert_eq!(admin.profile.role, Role::Admin);
    }

    #[test]
    fn prepare_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_lookup(|var| match var {
            "DATABASE_PATH" => Some(dir.path().join("db.sqlite").display().to_string()),
            "UPLOAD_DIR" => Some(dir.path().join("uploads").display().to_string()),
            _ => None,
        })
        .unwrap();

        prepare(&config).unwrap();
        let state = prepare(&config).unwrap();

        assert!(config.upload_dir.is_dir());
        let conn = state.store.connect().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn restart_resumes_past_the_highest_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_lookup(|var| match var {
            "DATABASE_PATH" => Some(dir.path().join("db.sqlite").display().to_string()),
            "UPLOAD_DIR" => Some(dir.path().join("uploads").display().to_string()),
            _ => None,
        })
        .unwrap();

        let state = prepare(&config).unwrap();
        let mut conn = state.store.connect().unwrap();
        let admin = users::find_by_email(&conn, &config.admin.email).unwrap().unwrap();
        // The larger stamp carries the older creation time.
        for (batch_id, created_at) in [
            ("BATCH-4000000000000", "2096-10-01T00:00:00.000Z"),
            ("BATCH-4000000000003", "2096-09-01T00:00:00.000Z"),
        ] {
            lists::save_distribution(
                &mut conn,
                &lists::NewBatch {
                    batch_id: batch_id.to_string(),
                    file_name: "contacts.csv".to_string(),
                    checksum: String::new(),
                    total_records: 0,
                    distributed_records: 0,
                    uploaded_by: admin.profile.id.clone(),
                    created_at: created_at.to_string(),
                },
                &[],
            )
            .unwrap();
        }

        let restarted = prepare(&config).unwrap();
        assert_eq!(restarted.batch_ids.next_id(), "BATCH-4000000000004");
    }
}
