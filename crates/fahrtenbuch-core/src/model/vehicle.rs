use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::require_non_empty;
use crate::error::{FleetError, FleetResult};
use crate::id::{AssignmentId, CompanyId, UserId, VehicleId};
use crate::time::now_utc;

/// Earliest plausible model year.
const FIRST_MODEL_YEAR: i32 = 1886;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

/// A vehicle owned by exactly one company.
///
/// `is_public` grants every driver of the same company read and use access
/// without an explicit assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub company_id: CompanyId,
    pub brand: String,
    pub model: String,
    pub license_plate: String,
    pub vin: String,
    pub fuel_type: FuelType,
    pub year: i32,
    pub mileage: f64,
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Mutable vehicle fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub brand: String,
    pub model: String,
    pub license_plate: String,
    pub vin: String,
    pub fuel_type: FuelType,
    pub year: i32,
    pub mileage: f64,
    pub is_public: bool,
    pub notes: Option<String>,
}

impl VehicleDraft {
    /// Checks field-level business rules.
    ///
    /// License plate and VIN are not required to be unique.
    pub fn validate(&self, current_year: i32) -> FleetResult<()> {
        require_non_empty("brand", &self.brand)?;
        require_non_empty("model", &self.model)?;
        require_non_empty("license plate", &self.license_plate)?;
        require_non_empty("vin", &self.vin)?;
        if self.year < FIRST_MODEL_YEAR || self.year > current_year + 1 {
            return Err(FleetError::validation(format!(
                "year must be between {FIRST_MODEL_YEAR} and {}",
                current_year + 1
            )));
        }
        if !self.mileage.is_finite() || self.mileage < 0.0 {
            return Err(FleetError::validation("mileage must be a non-negative number"));
        }
        Ok(())
    }

    /// Materializes a new vehicle owned by `company_id`.
    pub fn into_vehicle(self, company_id: CompanyId) -> Vehicle {
        Vehicle {
            id: VehicleId::generate(),
            company_id,
            brand: self.brand,
            model: self.model,
            license_plate: self.license_plate,
            vin: self.vin,
            fuel_type: self.fuel_type,
            year: self.year,
            mileage: self.mileage,
            is_public: self.is_public,
            notes: self.notes,
        }
    }
}

/// Explicit grant of a user's right to use a vehicle.
///
/// Unique per `(user_id, vehicle_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleAssignment {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub vehicle_id: VehicleId,
    pub assigned_by: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
}

impl VehicleAssignment {
    pub fn new(user_id: UserId, vehicle_id: VehicleId, assigned_by: UserId) -> Self {
        Self {
            id: AssignmentId::generate(),
            user_id,
            vehicle_id,
            assigned_by,
            assigned_at: now_utc(),
        }
    }
}
