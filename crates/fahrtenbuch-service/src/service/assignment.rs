use fahrtenbuch_auth::{
    AccessFacts, Actor, DenyReason, Operation, ResourceDescriptor, authorize, profile_for_user,
    resolve,
};
use fahrtenbuch_core::{FleetError, FleetResult, UserId, Vehicle, VehicleAssignment, VehicleId};
use fahrtenbuch_storage::{Query, ReadTransaction, RecordReader, RecordWriter, fields};

use super::{FleetService, on_unique_violation};

async fn load_vehicle<T>(tx: &T, vehicle_id: &VehicleId) -> FleetResult<Vehicle>
where
    T: ReadTransaction + ?Sized,
{
    tx.fetch::<Vehicle>(vehicle_id.as_str())
        .await?
        .ok_or_else(|| FleetError::not_found("vehicle", vehicle_id.as_str()))
}

fn assignment_query(vehicle_id: &VehicleId, user_id: &UserId) -> Query {
    Query::by(fields::USER_ID, user_id.as_str()).equals(fields::VEHICLE_ID, vehicle_id.as_str())
}

impl FleetService {
    /// Grants `user_id` the use of a vehicle.
    ///
    /// The caller must administer the vehicle's company and the assignee must
    /// hold a profile in that same company.
    pub async fn assign_vehicle(
        &self,
        actor: &Actor,
        vehicle_id: &VehicleId,
        user_id: &UserId,
    ) -> FleetResult<VehicleAssignment> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        let vehicle = load_vehicle(&*tx, vehicle_id).await?;
        authorize(
            &profile,
            &ResourceDescriptor::assignment(&vehicle),
            Operation::Create,
            &AccessFacts::none(),
        )?;

        let assignee_in_tenant = profile_for_user(&*tx, user_id)
            .await?
            .is_some_and(|p| p.belongs_to(&vehicle.company_id));
        if !assignee_in_tenant {
            tracing::debug!(
                user_id = %user_id,
                vehicle_id = %vehicle_id,
                "assignee outside tenant"
            );
            return Err(DenyReason::CrossTenant.into());
        }

        let already_assigned =
            || FleetError::already_assigned(vehicle_id.as_str(), user_id.as_str());
        let query = assignment_query(vehicle_id, user_id);
        if tx.find_first::<VehicleAssignment>(&query).await?.is_some() {
            return Err(already_assigned());
        }

        let assignment =
            VehicleAssignment::new(user_id.clone(), vehicle_id.clone(), profile.user_id.clone());
        on_unique_violation(tx.insert_record(&assignment).await, already_assigned)?;
        tx.commit().await?;

        tracing::info!(vehicle_id = %vehicle_id, user_id = %user_id, "vehicle assigned");
        Ok(assignment)
    }

    /// Revokes an assignment. Returns `false` if there was none.
    pub async fn unassign_vehicle(
        &self,
        actor: &Actor,
        vehicle_id: &VehicleId,
        user_id: &UserId,
    ) -> FleetResult<bool> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        let vehicle = load_vehicle(&*tx, vehicle_id).await?;
        authorize(
            &profile,
            &ResourceDescriptor::assignment(&vehicle),
            Operation::Delete,
            &AccessFacts::none(),
        )?;

        let removed = tx
            .delete_records_where::<VehicleAssignment>(&assignment_query(vehicle_id, user_id))
            .await?;
        tx.commit().await?;

        if removed > 0 {
            tracing::info!(vehicle_id = %vehicle_id, user_id = %user_id, "vehicle unassigned");
        }
        Ok(removed > 0)
    }

    /// Assignments of one vehicle. Admin of the owning company only.
    pub async fn list_vehicle_assignments(
        &self,
        actor: &Actor,
        vehicle_id: &VehicleId,
    ) -> FleetResult<Vec<VehicleAssignment>> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        let vehicle = load_vehicle(&*tx, vehicle_id).await?;
        authorize(
            &profile,
            &ResourceDescriptor::assignment(&vehicle),
            Operation::List,
            &AccessFacts::none(),
        )?;
        let query = Query::by(fields::VEHICLE_ID, vehicle_id.as_str());
        Ok(tx.find::<VehicleAssignment>(&query).await?)
    }
}
