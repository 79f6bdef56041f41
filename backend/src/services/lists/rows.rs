use crate::error::{ApiError, ApiResult};
use crate::services::lists::validate::RawRow;
use log::warn;
use std::io::Read;

pub const PARSE_FAILED: &str = "Error parsing CSV file";

/// Reads CSV rows keyed by the header line.
///
/// Header cells are trimmed and short rows are accepted; missing cells are
/// simply absent from the row map.
pub fn read_rows<R: Read>(source: R) -> ApiResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().map_err(parse_failed)?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_failed)?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn parse_failed(e: csv::Error) -> ApiError {
    warn!("CSV parsing error: {}", e);
    ApiError::Parse(PARSE_FAILED.to_string())
}
