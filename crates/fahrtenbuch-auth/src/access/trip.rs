use fahrtenbuch_core::{
    AttachmentId, FleetError, FleetResult, Trip, TripAttachment, TripId, UserProfile,
};
use fahrtenbuch_storage::{ReadTransaction, RecordReader};

use crate::policy::{AccessFacts, Operation, ResourceDescriptor, authorize};

/// Loads a trip and checks `operation` on it.
pub async fn check_trip_access<T>(
    tx: &T,
    profile: &UserProfile,
    trip_id: &TripId,
    operation: Operation,
) -> FleetResult<Trip>
where
    T: ReadTransaction + ?Sized,
{
    let trip = tx
        .fetch::<Trip>(trip_id.as_str())
        .await?
        .ok_or_else(|| FleetError::not_found("trip", trip_id.as_str()))?;

    authorize(profile, &ResourceDescriptor::trip(&trip), operation, &AccessFacts::none())?;
    Ok(trip)
}

/// An attachment together with the trip that owns it.
#[derive(Debug, Clone)]
pub struct AttachmentAccess {
    pub attachment: TripAttachment,
    pub trip: Trip,
}

/// Loads an attachment and checks `operation` against its owning trip.
pub async fn check_attachment_access<T>(
    tx: &T,
    profile: &UserProfile,
    attachment_id: &AttachmentId,
    operation: Operation,
) -> FleetResult<AttachmentAccess>
where
    T: ReadTransaction + ?Sized,
{
    let not_found = || FleetError::not_found("attachment", attachment_id.as_str());

    let attachment = tx
        .fetch::<TripAttachment>(attachment_id.as_str())
        .await?
        .ok_or_else(not_found)?;
    // An attachment whose trip is gone is unreachable.
    let trip = tx
        .fetch::<Trip>(attachment.trip_id.as_str())
        .await?
        .ok_or_else(not_found)?;

    authorize(
        profile,
        &ResourceDescriptor::attachment(&trip),
        operation,
        &AccessFacts::none(),
    )?;
    Ok(AttachmentAccess { attachment, trip })
}
