//! Diesel-backed valuation repository.

use diesel::prelude::*;

use super::model::ValuationRow;
use super::schema::valuation_records::dsl as records;
use super::DbPool;
use crate::domain::{PayloadField, ValuationRecord};
use crate::error::{Error, Result};
use crate::port::ValuationRepository;

pub struct DieselValuationRepository {
    pool: DbPool,
}

impl DieselValuationRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(&self) -> Result<super::PooledConnection> {
        self.pool.get().map_err(|e| Error::Database(e.to_string()))
    }
}

impl ValuationRepository for DieselValuationRepository {
    fn find_latest_with(
        &self,
        vin: &str,
        field: PayloadField,
    ) -> Result<Option<ValuationRecord>> {
        let mut conn = self.connection()?;

        let base = records::valuation_records
            .filter(records::vin.eq(vin))
            .order(records::updated_at.desc());

        // Diesel needs one statically-typed query per payload column.
        let row = match field {
            PayloadField::DrivlyPricing => base
                .filter(records::drivly_pricing.is_not_null())
                .first::<ValuationRow>(&mut conn)
                .optional(),
            PayloadField::DrivlyOffer => base
                .filter(records::drivly_offer.is_not_null())
                .first::<ValuationRow>(&mut conn)
                .optional(),
            PayloadField::Edmunds => base
                .filter(records::edmunds.is_not_null())
                .first::<ValuationRow>(&mut conn)
                .optional(),
            PayloadField::Vincario => base
                .filter(records::vincario.is_not_null())
                .first::<ValuationRow>(&mut conn)
                .optional(),
        }
        .map_err(|e| Error::Database(e.to_string()))?;

        row.map(ValuationRecord::try_from).transpose()
    }

    fn insert(&self, record: &ValuationRecord) -> Result<()> {
        let mut conn = self.connection()?;
        let row = ValuationRow::try_from(record)?;

        diesel::insert_into(records::valuation_records)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn exists_with(&self, user_device_id: &str, field: PayloadField) -> Result<bool> {
        let mut conn = self.connection()?;

        let base = records::valuation_records.filter(records::user_device_id.eq(user_device_id));

        let count: i64 = match field {
            PayloadField::DrivlyPricing => base
                .filter(records::drivly_pricing.is_not_null())
                .count()
                .get_result(&mut conn),
            PayloadField::DrivlyOffer => base
                .filter(records::drivly_offer.is_not_null())
                .count()
                .get_result(&mut conn),
            PayloadField::Edmunds => base
                .filter(records::edmunds.is_not_null())
                .count()
                .get_result(&mut conn),
            PayloadField::Vincario => base
                .filter(records::vincario.is_not_null())
                .count()
                .get_result(&mut conn),
        }
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(count > 0)
    }
}
