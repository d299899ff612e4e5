//! Domain records persisted by the document store.
//!
//! Records serialize with camelCase field names; those names are what the
//! storage indexes filter on.

mod company;
mod invite;
mod trip;
mod user;
mod vehicle;

pub use company::{Company, CompanyDraft};
pub use invite::Invite;
pub use trip::{FileType, Trip, TripAttachment, TripDraft};
pub use user::{Role, User, UserProfile, normalize_email};
pub use vehicle::{FuelType, Vehicle, VehicleAssignment, VehicleDraft};

use crate::error::{FleetError, FleetResult};

pub(crate) fn require_non_empty(field: &str, value: &str) -> FleetResult<()> {
    if value.trim().is_empty() {
        return Err(FleetError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}
