use fahrtenbuch_core::{FleetError, FleetResult, UserProfile, Vehicle, VehicleAssignment, VehicleId};
use fahrtenbuch_storage::{Query, ReadTransaction, RecordReader, fields};

use crate::policy::{AccessFacts, Operation, ResourceDescriptor, authorize};

/// Gathers assignment and visibility facts for `profile` on `vehicle`.
pub async fn vehicle_facts<T>(
    tx: &T,
    profile: &UserProfile,
    vehicle: &Vehicle,
) -> FleetResult<AccessFacts>
where
    T: ReadTransaction + ?Sized,
{
    let query = Query::by(fields::USER_ID, profile.user_id.as_str())
        .equals(fields::VEHICLE_ID, vehicle.id.as_str());
    let assignment = tx.find_first::<VehicleAssignment>(&query).await?;
    Ok(AccessFacts {
        assignment_exists: assignment.is_some(),
        vehicle_is_public: vehicle.is_public,
    })
}

/// Loads a vehicle and checks `operation` on it.
pub async fn check_vehicle_access<T>(
    tx: &T,
    profile: &UserProfile,
    vehicle_id: &VehicleId,
    operation: Operation,
) -> FleetResult<Vehicle>
where
    T: ReadTransaction + ?Sized,
{
    let vehicle = tx
        .fetch::<Vehicle>(vehicle_id.as_str())
        .await?
        .ok_or_else(|| FleetError::not_found("vehicle", vehicle_id.as_str()))?;

    let facts = vehicle_facts(tx, profile, &vehicle).await?;
    authorize(profile, &ResourceDescriptor::vehicle(&vehicle), operation, &facts)?;
    Ok(vehicle)
}
