//! `POST /api/lists/upload`: receive a CSV, validate it, distribute it.
//!
//! ## Workflow
//!
//! 1.  **Receive**: the multipart `file` field is streamed into a
//!     `NamedTempFile` in the upload directory while its MD5 is computed. The
//!     temp file is owned by `ReceivedUpload` and removed when that value is
//!     dropped, whichever way the request ends.
//!
//! 2.  **Process**: on the blocking pool, the file is parsed into rows, the
//!     rows are validated, the current agents are loaded and the records are
//!     distributed.
//!
//! 3.  **Persist**: the batch row and all assigned items are written in one
//!     transaction.

use crate::auth::AdminIdentity;
use crate::error::{ApiError, ApiResult};
use crate::services::lists::distribute::distribute;
use crate::services::lists::rows::read_rows;
use crate::services::lists::validate::{validate_rows, ValidatedRows};
use crate::state::AppState;
use crate::store::lists::{self, NewBatch};
use crate::store::users;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::batch::UploadSummary;
use common::responses::{FieldError, UploadResponse};
use futures_util::StreamExt;
use log::{info, warn};
use md5::Context;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const FILE_FIELD: &str = "file";
pub const NO_FILE: &str = "Please upload a file";
pub const NOT_CSV: &str = "Only CSV files are allowed";
pub const NO_VALID_DATA: &str = "No valid data found in CSV file";
pub const UPLOADED: &str = "File uploaded and distributed successfully";

/// Content types browsers send for `.csv` files.
const CSV_CONTENT_TYPES: [&str; 4] = [
    "text/csv",
    "application/csv",
    "application/vnd.ms-excel",
    "text/plain",
];

/// An upload held in temporary storage. Dropping it deletes the file.
#[derive(Debug)]
pub struct ReceivedUpload {
    pub file: NamedTempFile,
    pub file_name: String,
    pub checksum: String,
    pub size: usize,
}

/// Actix web handler for `POST /api/lists/upload`.
///
/// # Arguments
/// * `admin` - The signed-in administrator, recorded as the batch's uploader.
/// * `payload` - The multipart body; only its `file` field is read.
///
/// # Returns
/// - `200 OK` with the batch summary, plus `errors` when some rows were rejected.
/// - `400 Bad Request` for a missing or non-CSV file, an oversized or unreadable
///   upload, no valid rows, or no agents to distribute to.
pub async fn process(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    match upload_and_distribute(admin, state, payload).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.error_response(),
    }
}

async fn upload_and_distribute(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    payload: Multipart,
) -> ApiResult<UploadResponse> {
    let upload = receive_upload(
        payload,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
    )
    .await?;
    info!(
        "received upload '{}' ({} bytes, md5 {})",
        upload.file_name, upload.size, upload.checksum
    );

    let state = state.into_inner();
    let uploader = admin.0.profile.id;
    tokio::task::spawn_blocking(move || distribute_upload(&state, upload, &uploader))
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))?
}

pub fn is_csv_upload(content_type: Option<&str>, file_name: &str) -> bool {
    let csv_name = file_name.to_ascii_lowercase().ends_with(".csv");
    match content_type {
        Some(ct) if CSV_CONTENT_TYPES.contains(&ct) => true,
        Some("application/octet-stream") | None => csv_name,
        Some(_) => false,
    }
}

fn read_error(e: impl std::fmt::Display) -> ApiError {
    ApiError::Parse(format!("Error reading upload: {}", e))
}

/// Streams the `file` field of a multipart body into temporary storage.
///
/// Other fields are drained and ignored. Any error drops the partially
/// written temp file, which removes it.
pub async fn receive_upload(
    mut payload: Multipart,
    upload_dir: &Path,
    max_bytes: usize,
) -> ApiResult<ReceivedUpload> {
    let mut received: Option<ReceivedUpload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(read_error)?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some(FILE_FIELD) || received.is_some() {
            while let Some(chunk) = field.next().await {
                chunk.map_err(read_error)?;
            }
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if file_name.is_empty() {
            return Err(missing_file());
        }
        let content_type = field.content_type().map(|m| m.essence_str().to_string());
        if !is_csv_upload(content_type.as_deref(), &file_name) {
            return Err(ApiError::Parse(NOT_CSV.to_string()));
        }

        fs::create_dir_all(upload_dir)?;
        let mut file = NamedTempFile::new_in(upload_dir)?;
        let mut hasher = Context::new();
        let mut size = 0usize;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(read_error)?;
                size += chunk.len();
                if size > max_bytes {
                    return Err(ApiError::Parse(format!(
                        "File is larger than the {} byte limit",
                        max_bytes
                    )));
                }
                hasher.consume(&chunk);
                writer.write_all(&chunk)?;
            }
            writer.flush()?;
        }

        received = Some(ReceivedUpload {
            file,
            file_name,
            checksum: format!("{:x}", hasher.finalize()),
            size,
        });
    }

    received.ok_or_else(missing_file)
}

fn missing_file() -> ApiError {
    ApiError::Validation {
        message: NO_FILE.to_string(),
        fields: vec![FieldError {
            field: FILE_FIELD.to_string(),
            message: NO_FILE.to_string(),
        }],
    }
}

/// Parses, validates, distributes and persists one upload.
///
/// Takes the upload by value: its temp file is deleted when this returns.
pub fn distribute_upload(
    state: &AppState,
    upload: ReceivedUpload,
    uploader_id: &str,
) -> ApiResult<UploadResponse> {
    let rows = read_rows(BufReader::new(upload.file.reopen()?))?;
    let ValidatedRows {
        records,
        rejections,
    } = validate_rows(rows);

    if records.is_empty() {
        warn!(
            "upload '{}' had no valid rows ({} rejected)",
            upload.file_name,
            rejections.len()
        );
        return Err(ApiError::Precondition {
            message: NO_VALID_DATA.to_string(),
            rejections,
        });
    }

    let mut conn = state.store.connect()?;
    let agent_ids = users::agent_ids(&conn)?;
    let distribution = distribute(records, &agent_ids, &state.batch_ids)?;

    let batch = NewBatch {
        batch_id: distribution.batch_id.clone(),
        file_name: upload.file_name.clone(),
        checksum: upload.checksum.clone(),
        total_records: distribution.total_records,
        distributed_records: distribution.distributed_records,
        uploaded_by: uploader_id.to_string(),
        created_at: distribution.created_at.clone(),
    };
    lists::save_distribution(&mut conn, &batch, &distribution.assignments)?;

    info!(
        "batch {} created: {} records across {} agents, {} rows rejected",
        batch.batch_id,
        batch.distributed_records,
        agent_ids.len(),
        rejections.len()
    );

    Ok(UploadResponse {
        message: UPLOADED.to_string(),
        distribution: UploadSummary {
            batch_id: batch.batch_id,
            total_records: batch.total_records,
            distributed_records: batch.distributed_records,
            agents_count: agent_ids.len(),
            file_name: upload.file_name,
        },
        errors: if rejections.is_empty() {
            None
        } else {
            Some(rejections)
        },
    })
}
