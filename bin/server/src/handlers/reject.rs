use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

/// Answer every non-upload request as if nothing were there.
///
/// GET, HEAD and anything else that is not POST/PUT land here, so the
/// upload endpoint looks like an ordinary missing resource.
pub async fn reject(req: HttpRequest) -> HttpResponse {
    info!(
        method = %req.method(),
        path = ?req.path(),
        "Rejecting request because it's not an upload"
    );
    HttpResponse::NotFound().finish()
}
