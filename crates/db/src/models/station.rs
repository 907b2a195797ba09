//! Station entity model and DTOs.

use lockerhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A station row from the `stations` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a station.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}
