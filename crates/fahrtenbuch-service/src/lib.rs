//! # fahrtenbuch-service
//!
//! The operations of the fleet logbook. Every operation takes the calling
//! [`Actor`], runs inside exactly one storage transaction, resolves the
//! actor's profile, asks the tenant policy, validates, and only then writes.
//!
//! ```ignore
//! use fahrtenbuch_service::{Actor, FleetService, config::AppConfig};
//!
//! let service = FleetService::from_config(&AppConfig::default());
//! let company = service.create_company(&Actor::user("u1"), draft).await?;
//! ```

pub mod bootstrap;
pub mod config;
pub mod observability;
pub mod service;
pub mod views;

pub use fahrtenbuch_auth::{Actor, ConsumeOutcome};
pub use service::FleetService;
pub use views::{
    AttachmentWithUrl, CurrentUser, TripFilter, TripWithContext, TripWithDriver, TripWithVehicle,
};
