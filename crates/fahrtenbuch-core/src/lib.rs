//! # fahrtenbuch-core
//!
//! Domain records, identifiers and error kinds shared by every crate of the
//! fleet logbook backend.
//!
//! The tenant boundary is the [`Company`]. Vehicles, profiles and trips all
//! point back to a company id; a [`Trip`] additionally owns its
//! [`TripAttachment`]s.

pub mod error;
pub mod id;
pub mod model;
pub mod time;

pub use error::{ErrorCategory, ErrorKind, FleetError, FleetResult};
pub use id::{
    AssignmentId, AttachmentId, CompanyId, InviteId, ProfileId, TripId, UserId, VehicleId,
    generate_id,
};
pub use model::{
    Company, CompanyDraft, FileType, FuelType, Invite, Role, Trip, TripAttachment, TripDraft,
    User, UserProfile, Vehicle, VehicleAssignment, VehicleDraft, normalize_email,
};
pub use time::{now_utc, parse_clock_time, parse_trip_date};
