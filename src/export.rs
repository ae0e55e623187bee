//! Streamed CSV rendering of a filtered result set.
//!
//! The body is produced incrementally: a UTF-8 BOM plus the header record
//! go out first, then one chunk per row. Output already flushed to the
//! client is never rolled back; a failure mid-export can only truncate the
//! stream. Dropping the body (client disconnect) stops row production.

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use futures::StreamExt;
use futures::stream;
use serde_json::Value;

use crate::models::Record;

/// Byte-order mark so spreadsheet imports detect the encoding.
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Column set for an export: keys of the first returned row when rows
/// exist, otherwise the requested projection list.
pub fn export_columns(rows: &[Record], select: &str) -> Vec<String> {
    rows.first().map_or_else(
        || {
            select
                .split(',')
                .map(str::trim)
                .filter(|col| !col.is_empty())
                .map(String::from)
                .collect()
        },
        |row| row.keys().cloned().collect(),
    )
}

/// Render one loosely-typed value as a CSV cell.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Encode one record with RFC 4180 escaping: fields containing a comma,
/// quote or newline are quoted with internal quotes doubled.
fn encode_record(fields: &[String]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

/// Build the streamed CSV attachment for one exported page.
///
/// The filename carries the page number and a timestamp so repeated
/// exports do not collide.
pub fn stream_csv(rows: Vec<Record>, select: &str, page: u64) -> Response {
    let columns = export_columns(&rows, select);

    let header_chunk = encode_record(&columns).map(|record| {
        let mut bytes = BOM.to_vec();
        bytes.extend(record);
        bytes
    });

    let row_chunks = rows.into_iter().map(move |row| {
        let fields: Vec<String> = columns.iter().map(|col| cell(row.get(col))).collect();
        encode_record(&fields)
    });

    let body = Body::from_stream(
        stream::iter(std::iter::once(header_chunk)).chain(stream::iter(row_chunks)),
    );

    let filename = format!(
        "afiliados_p{page}_{}.csv",
        Utc::now().format("%Y%m%d%H%M%S")
    );
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
