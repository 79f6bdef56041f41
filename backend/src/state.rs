use crate::config::AppConfig;
use crate::services::lists::batch_id::BatchIdGenerator;
use crate::store::Store;
use std::sync::Arc;

/// Shared application state, injected into handlers as `web::Data<AppState>`.
///
/// Cloning is cheap and every clone shares the same batch-id generator, so
/// ids stay unique across all Actix workers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<AppConfig>,
    pub batch_ids: Arc<BatchIdGenerator>,
}
