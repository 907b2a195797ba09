//! Shared query parameter types for API handlers.

use lockerhub_core::types::DbId;
use serde::Deserialize;

/// Page-number pagination for `GET /lockers` (`?page=&limit=&stationId=`).
///
/// Both `page` and `limit` are validated by the listing service; they are
/// optional here so a missing value yields a domain validation error rather
/// than an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub station_id: Option<DbId>,
}
