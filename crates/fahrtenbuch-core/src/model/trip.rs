use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::require_non_empty;
use crate::error::{FleetError, FleetResult};
use crate::id::{AttachmentId, CompanyId, TripId, UserId, VehicleId};
use crate::time::{now_utc, parse_clock_time, parse_trip_date};

/// A logbook entry ("Fahrtenbuch" entry).
///
/// `company_id` is copied from the vehicle when the trip is created and is
/// never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    pub user_id: UserId,
    pub vehicle_id: VehicleId,
    pub company_id: CompanyId,
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub location_start: String,
    pub location_end: String,
    pub km_start: f64,
    pub km_end: f64,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Trip {
    /// Distance driven according to the odometer.
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.km_end - self.km_start
    }
}

/// Mutable trip fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub location_start: String,
    pub location_end: String,
    pub km_start: f64,
    pub km_end: f64,
    pub purpose: String,
    pub notes: Option<String>,
}

impl TripDraft {
    /// Checks the odometer ordering and field formats.
    ///
    /// `max_distance_km` caps the distance of a single trip when set.
    pub fn validate(&self, max_distance_km: Option<f64>) -> FleetResult<()> {
        if !self.km_start.is_finite() || !self.km_end.is_finite() {
            return Err(FleetError::validation("kilometer readings must be numbers"));
        }
        if self.km_start >= self.km_end {
            return Err(FleetError::validation(
                "End kilometers must be greater than start kilometers",
            ));
        }
        if let Some(max) = max_distance_km
            && self.km_end - self.km_start > max
        {
            return Err(FleetError::validation(format!(
                "trip distance exceeds the maximum of {max} km"
            )));
        }
        parse_trip_date(&self.date)?;
        parse_clock_time(&self.time_start)?;
        parse_clock_time(&self.time_end)?;
        require_non_empty("start location", &self.location_start)?;
        require_non_empty("end location", &self.location_end)?;
        require_non_empty("purpose", &self.purpose)?;
        Ok(())
    }

    /// Materializes a new trip.
    pub fn into_trip(self, user_id: UserId, vehicle_id: VehicleId, company_id: CompanyId) -> Trip {
        Trip {
            id: TripId::generate(),
            user_id,
            vehicle_id,
            company_id,
            date: self.date,
            time_start: self.time_start,
            time_end: self.time_end,
            location_start: self.location_start,
            location_end: self.location_end,
            km_start: self.km_start,
            km_end: self.km_end,
            purpose: self.purpose,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Pdf,
}

/// A file attached to a trip; deleted together with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAttachment {
    pub id: AttachmentId,
    pub trip_id: TripId,
    /// Opaque blob store reference.
    pub storage_ref: String,
    pub file_name: String,
    pub file_type: FileType,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

impl TripAttachment {
    pub fn new(
        trip_id: TripId,
        storage_ref: impl Into<String>,
        file_name: impl Into<String>,
        file_type: FileType,
    ) -> Self {
        Self {
            id: AttachmentId::generate(),
            trip_id,
            storage_ref: storage_ref.into(),
            file_name: file_name.into(),
            file_type,
            uploaded_at: now_utc(),
        }
    }
}
