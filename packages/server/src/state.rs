use std::sync::Arc;

use common::media::MediaStore;
use sea_orm::DatabaseConnection;

use crate::catalog::CatalogCache;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub media_store: Arc<dyn MediaStore>,
    pub catalog_cache: Arc<CatalogCache>,
}
