//! Resource access checkers.
//!
//! Each checker loads its resource, failing with `NotFound` only when the id
//! does not exist at all, gathers the facts the policy engine needs, and
//! returns the resource once the engine allows the operation. A resource of
//! another tenant yields `NotAuthorized`, never `NotFound`.

mod trip;
mod vehicle;

pub use trip::{AttachmentAccess, check_attachment_access, check_trip_access};
pub use vehicle::{check_vehicle_access, vehicle_facts};
