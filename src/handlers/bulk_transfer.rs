use crate::config::ImportConfig;
use crate::error::AppError;
use crate::models::*;
use crate::services::BulkTransferService;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, Result, web};
use futures_util::StreamExt;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const UPLOAD_FIELD: &str = "file";

/// Bytes of the `file` part, capped at `limit`. Other parts are drained and
/// ignored.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut upload: Option<Vec<u8>> = None;

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::UploadError(e.to_string()))?;
        let is_file = field.name() == Some(UPLOAD_FIELD);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::UploadError(e.to_string()))?;
            if !is_file {
                continue;
            }
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::UploadError(format!(
                    "File exceeds the {limit} byte upload limit"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        if is_file && upload.is_none() {
            upload = Some(bytes);
        }
    }

    match upload {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(AppError::UploadError("No file uploaded".to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/import/excel",
    tag = "bulk-transfer",
    request_body(content = String, content_type = "multipart/form-data", description = "Spreadsheet in the `file` field"),
    responses(
        (status = 200, description = "Rows imported; rejected rows listed", body = ImportSummary),
        (status = 400, description = "Missing or unreadable file", body = ErrorResponse)
    )
)]
pub async fn import_excel(
    bulk_service: web::Data<BulkTransferService>,
    import_config: web::Data<ImportConfig>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let bytes = match read_upload(payload, import_config.max_upload_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => return Ok(e.error_response()),
    };

    match bulk_service.import_customers(&bytes).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/export/excel",
    tag = "bulk-transfer",
    responses(
        (status = 200, description = "customers.xlsx attachment", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
pub async fn export_excel(bulk_service: web::Data<BulkTransferService>) -> Result<HttpResponse> {
    match bulk_service.export_customers().await {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"customers.xlsx\"",
            ))
            .body(bytes)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn bulk_transfer_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/import/excel", web::post().to(import_excel))
        .route("/export/excel", web::get().to(export_excel));
}
