pub mod agents;
pub mod auth;
pub mod lists;

use crate::error::ApiError;
use actix_web::web;
use common::responses::{FieldError, MessageResponse};

/// Largest JSON body accepted by any endpoint.
const JSON_LIMIT: usize = 64 * 1024;

/// Registers every API scope plus the JSON extractor configuration.
///
/// Used by `main` and by the integration tests so both run the same app.
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/test", web::get().to(health))
        .service(auth::configure_routes())
        .service(agents::configure_routes())
        .service(lists::configure_routes());
}

/// Turns malformed JSON bodies into `ApiError::Validation` responses.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            ApiError::Validation {
                message: "Invalid request body".to_string(),
                fields: vec![FieldError {
                    field: "body".to_string(),
                    message: err.to_string(),
                }],
            }
            .into()
        })
}

async fn health() -> web::Json<MessageResponse> {
    web::Json(MessageResponse {
        message: "Distribution server is running".to_string(),
    })
}
