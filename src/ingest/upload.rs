use actix_multipart::Multipart;
use bytes::BytesMut;
use futures_util::StreamExt;

use crate::error::{AppError, AppResult};

/// Name of the multipart field carrying the report file
pub const UPLOAD_FIELD: &str = "uploadfile";

/// Reads the report file out of a multipart form.
///
/// Fields other than [`UPLOAD_FIELD`] are drained and ignored. The first
/// matching field wins.
pub async fn read_report_file(mut payload: Multipart, max_size: usize) -> AppResult<Vec<u8>> {
    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?;

        let is_report = field.name() == Some(UPLOAD_FIELD);
        let mut buf = BytesMut::new();

        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?;
            if !is_report {
                continue;
            }
            if buf.len() + chunk.len() > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "Report file exceeds {} bytes",
                    max_size
                )));
            }
            buf.extend_from_slice(&chunk);
        }

        if is_report {
            return Ok(buf.to_vec());
        }
    }

    Err(AppError::Validation(format!(
        "Missing '{}' file field",
        UPLOAD_FIELD
    )))
}
