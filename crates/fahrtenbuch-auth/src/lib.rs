//! # fahrtenbuch-auth
//!
//! Authorization for the fleet logbook.
//!
//! ## Modules
//!
//! - [`identity`] - Maps an authenticated [`Actor`] to its bound profile
//! - [`policy`] - Pure tenant policy engine (`decide`)
//! - [`access`] - Per-resource checkers that gather facts and call the engine
//! - [`onboarding`] - Invite creation and single-use consumption rules
//! - [`config`] - Access-related configuration
//!
//! Only [`access`] and [`identity`] read from storage, and only through a
//! transaction handed in by the caller. Nothing in this crate writes.

pub mod access;
pub mod config;
pub mod identity;
pub mod onboarding;
pub mod policy;

pub use access::{
    AttachmentAccess, check_attachment_access, check_trip_access, check_vehicle_access,
    vehicle_facts,
};
pub use config::AccessConfig;
pub use identity::{Actor, profile_for_user, resolve, resolve_optional};
pub use onboarding::{ConsumeOutcome, ConsumeTransition, InviteProtocol, InviteRequest};
pub use policy::{
    AccessDecision, AccessFacts, DenyReason, GrantClass, Operation, ResourceDescriptor,
    ResourceKind, authorize, decide,
};
