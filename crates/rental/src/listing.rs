//! Paginated enumeration of live lockers.

use lockerhub_core::pagination::{PageMetadata, PageRequest};
use lockerhub_core::types::DbId;
use lockerhub_db::models::locker::Locker;
use lockerhub_db::repositories::LockerRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::RentalResult;

/// One page of lockers plus its pagination block.
#[derive(Debug, Serialize)]
pub struct LockerPage {
    pub items: Vec<Locker>,
    pub metadata: PageMetadata,
}

#[derive(Clone)]
pub struct ListingService {
    pool: PgPool,
}

impl ListingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List live lockers newest first (`created_at DESC, id DESC`), optionally
    /// restricted to one station.
    ///
    /// `page` and `limit` must both be positive and `page` must not exceed the
    /// number of pages; the id tie-break keeps page boundaries stable across
    /// calls.
    pub async fn list(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
        station_id: Option<DbId>,
    ) -> RentalResult<LockerPage> {
        let request = PageRequest::new(page, limit)?;
        let count = LockerRepo::count_live(&self.pool, station_id).await?;
        let metadata = request.resolve(count)?;
        let items =
            LockerRepo::list_page(&self.pool, station_id, request.limit, request.offset()).await?;
        Ok(LockerPage { items, metadata })
    }
}
