//! Row types for the valuation_records table.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::valuation_records;
use crate::domain::ValuationRecord;
use crate::error::Error;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = valuation_records)]
pub struct ValuationRow {
    pub id: String,
    pub vin: String,
    pub user_device_id: Option<String>,
    pub vehicle_token_id: Option<i64>,
    pub request_metadata: Option<String>,
    pub drivly_pricing: Option<String>,
    pub drivly_offer: Option<String>,
    pub edmunds: Option<String>,
    pub vincario: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn to_json_column(value: &Option<Value>) -> Result<Option<String>, Error> {
    value
        .as_ref()
        .map(|v| serde_json::to_string(v).map_err(Error::from))
        .transpose()
}

fn from_json_column(column: Option<String>) -> Result<Option<Value>, Error> {
    column
        .map(|raw| serde_json::from_str(&raw).map_err(Error::from))
        .transpose()
}

impl TryFrom<&ValuationRecord> for ValuationRow {
    type Error = Error;

    fn try_from(record: &ValuationRecord) -> Result<Self, Error> {
        Ok(Self {
            id: record.id.to_string(),
            vin: record.vin.clone(),
            user_device_id: record.user_device_id.clone(),
            vehicle_token_id: record.vehicle_token_id,
            request_metadata: to_json_column(&record.request_metadata)?,
            drivly_pricing: to_json_column(&record.drivly_pricing)?,
            drivly_offer: to_json_column(&record.drivly_offer)?,
            edmunds: to_json_column(&record.edmunds)?,
            vincario: to_json_column(&record.vincario)?,
            created_at: record.created_at.naive_utc(),
            updated_at: record.updated_at.naive_utc(),
        })
    }
}

impl TryFrom<ValuationRow> for ValuationRecord {
    type Error = Error;

    fn try_from(row: ValuationRow) -> Result<Self, Error> {
        Ok(Self {
            id: Uuid::parse_str(&row.id).map_err(|e| Error::Database(e.to_string()))?,
            vin: row.vin,
            user_device_id: row.user_device_id,
            vehicle_token_id: row.vehicle_token_id,
            request_metadata: from_json_column(row.request_metadata)?,
            drivly_pricing: from_json_column(row.drivly_pricing)?,
            drivly_offer: from_json_column(row.drivly_offer)?,
            edmunds: from_json_column(row.edmunds)?,
            vincario: from_json_column(row.vincario)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}
