//! HTTP request handlers

pub mod error;
pub mod reject;
pub mod upload;

use actix_web::web;

/// Register the upload routes.
///
/// Every path accepts POST and PUT; any other method, on any path, is a
/// plain 404 (never 405).
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .route(web::post().to(upload::upload))
            .route(web::put().to(upload::upload))
            .default_service(web::to(reject::reject)),
    )
    .default_service(web::to(reject::reject));
}
