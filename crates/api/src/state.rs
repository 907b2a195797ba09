use std::sync::Arc;

use lockerhub_db::DbPool;
use lockerhub_rental::{LifecycleArchive, ListingService, RentalAllocator};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and services share one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub allocator: RentalAllocator,
    pub archive: LifecycleArchive,
    pub listing: ListingService,
}

impl AppState {
    /// Build the services around one pool.
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        Self {
            allocator: RentalAllocator::new(pool.clone()),
            archive: LifecycleArchive::new(pool.clone()),
            listing: ListingService::new(pool.clone()),
            pool,
            config: Arc::new(config),
        }
    }
}
