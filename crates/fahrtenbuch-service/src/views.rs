//! Fixed result shapes of the read operations.

use fahrtenbuch_core::{
    FleetResult, Trip, TripAttachment, User, UserId, UserProfile, Vehicle, VehicleId,
    parse_trip_date,
};
use serde::Serialize;

/// The caller's identity record and profile, both optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user: Option<User>,
    pub profile: Option<UserProfile>,
}

/// A trip with its vehicle and driver profile.
///
/// Either side may be gone: deleting a vehicle keeps its trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripWithContext {
    pub trip: Trip,
    pub vehicle: Option<Vehicle>,
    pub driver: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripWithVehicle {
    pub trip: Trip,
    pub vehicle: Option<Vehicle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripWithDriver {
    pub trip: Trip,
    pub driver: Option<UserProfile>,
}

/// An attachment with its resolved download URL, if the blob store knows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentWithUrl {
    pub attachment: TripAttachment,
    pub url: Option<String>,
}

/// Narrows a company-wide trip listing. Dates are inclusive `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripFilter {
    pub vehicle_id: Option<VehicleId>,
    pub user_id: Option<UserId>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl TripFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vehicle(mut self, vehicle_id: VehicleId) -> Self {
        self.vehicle_id = Some(vehicle_id);
        self
    }

    #[must_use]
    pub fn driver(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn between(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_from = Some(from.into());
        self.date_to = Some(to.into());
        self
    }

    /// Rejects malformed date bounds.
    pub fn validate(&self) -> FleetResult<()> {
        for date in [&self.date_from, &self.date_to].into_iter().flatten() {
            parse_trip_date(date)?;
        }
        Ok(())
    }
}
