use crate::handlers::error::{log_failure, UploadError};
use crate::state::AppState;
use actix_web::http::header::{HeaderMap, CONTENT_LENGTH};
use actix_web::{web, HttpRequest, HttpResponse};
use common::file_utils;
use storage::StorageError;
use tracing::{error, info};

/// Handle a file upload (POST or PUT, raw request body)
pub async fn upload(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, UploadError> {
    receive(&req, payload, &state)
        .await
        .inspect_err(|e| log_failure(req.path(), e))
}

async fn receive(
    req: &HttpRequest,
    payload: web::Payload,
    state: &AppState,
) -> Result<HttpResponse, UploadError> {
    // Never log the query: it carries the secret
    if !state.secret.admits(req.query_string()) {
        return Err(UploadError::Rejected(
            "Secret parameter not found in URL parameters of request",
        ));
    }

    let filename = file_utils::filename_from_path(req.path())
        .map_err(|e| UploadError::Rejected(e.message()))?;

    let declared = declared_length(req.headers())?;

    let mut reserved = state.save_dir.create_unique(&filename).await?;

    let peer = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    info!(
        filename = ?filename,
        size = declared,
        peer = %peer,
        parts = state.writer.part_count(declared),
        "Receiving file"
    );

    let result = async {
        let written = state
            .writer
            .write(payload, &mut reserved.file, declared)
            .await?;
        reserved.file.sync_all().await.map_err(StorageError::Io)?;
        Ok::<u64, UploadError>(written)
    }
    .await;

    match result {
        Ok(written) => {
            info!(
                path = ?reserved.path,
                bytes = written,
                "File of size {} bytes saved",
                written
            );
            Ok(HttpResponse::Created().finish())
        }
        Err(e) => {
            error!(path = ?reserved.path, "Partial file left on disk");
            Err(e)
        }
    }
}

/// The body size announced by the client.
fn declared_length(headers: &HeaderMap) -> Result<u64, UploadError> {
    let value = headers
        .get(CONTENT_LENGTH)
        .ok_or(UploadError::MissingLength)?;
    let text = value.to_str().map_err(|_| {
        UploadError::InvalidLength(String::from_utf8_lossy(value.as_bytes()).into_owned())
    })?;
    text.trim()
        .parse::<u64>()
        .map_err(|_| UploadError::InvalidLength(text.to_string()))
}
