use std::collections::HashSet;

use fahrtenbuch_auth::{
    AccessFacts, Actor, Operation, ResourceDescriptor, ResourceKind, authorize,
    check_vehicle_access, resolve,
};
use fahrtenbuch_core::{FleetResult, Vehicle, VehicleAssignment, VehicleDraft, VehicleId};
use fahrtenbuch_storage::{Query, RecordReader, RecordWriter, StorageError, fields};

use super::{FleetService, current_year, tenant_of};

impl FleetService {
    /// Adds a vehicle to the caller's company. Admin only.
    pub async fn create_vehicle(&self, actor: &Actor, draft: VehicleDraft) -> FleetResult<Vehicle> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        let company_id = tenant_of(&profile)?.clone();
        authorize(
            &profile,
            &ResourceDescriptor::in_company(ResourceKind::Vehicle, &company_id),
            Operation::Create,
            &AccessFacts::none(),
        )?;
        draft.validate(current_year())?;

        let vehicle = draft.into_vehicle(company_id);
        tx.insert_record(&vehicle).await?;
        tx.commit().await?;

        tracing::info!(
            vehicle_id = %vehicle.id,
            company_id = %vehicle.company_id,
            "vehicle created"
        );
        Ok(vehicle)
    }

    /// Replaces a vehicle's fields. Admin of the owning company only.
    pub async fn update_vehicle(
        &self,
        actor: &Actor,
        vehicle_id: &VehicleId,
        draft: VehicleDraft,
    ) -> FleetResult<Vehicle> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        check_vehicle_access(&*tx, &profile, vehicle_id, Operation::Update).await?;
        draft.validate(current_year())?;

        let patch = serde_json::to_value(&draft).map_err(StorageError::from)?;
        let updated = tx
            .patch_record::<Vehicle>(vehicle_id.as_str(), &patch)
            .await?;
        tx.commit().await?;

        tracing::info!(vehicle_id = %vehicle_id, "vehicle updated");
        Ok(updated)
    }

    /// Deletes a vehicle together with all of its assignments.
    ///
    /// Trips logged against the vehicle are kept.
    pub async fn delete_vehicle(&self, actor: &Actor, vehicle_id: &VehicleId) -> FleetResult<()> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        check_vehicle_access(&*tx, &profile, vehicle_id, Operation::Delete).await?;

        let assignments = tx
            .delete_records_where::<VehicleAssignment>(&Query::by(
                fields::VEHICLE_ID,
                vehicle_id.as_str(),
            ))
            .await?;
        tx.delete_record::<Vehicle>(vehicle_id.as_str()).await?;
        tx.commit().await?;

        tracing::info!(vehicle_id = %vehicle_id, assignments, "vehicle deleted");
        Ok(())
    }

    /// Every vehicle of the caller's company. Admin only.
    pub async fn list_company_vehicles(&self, actor: &Actor) -> FleetResult<Vec<Vehicle>> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        let company_id = tenant_of(&profile)?;
        authorize(
            &profile,
            &ResourceDescriptor::in_company(ResourceKind::Vehicle, company_id),
            Operation::List,
            &AccessFacts::none(),
        )?;
        let query = Query::by(fields::COMPANY_ID, company_id.as_str());
        Ok(tx.find::<Vehicle>(&query).await?)
    }

    /// Vehicles the caller may read and use.
    ///
    /// Admins see their whole company. Drivers see their assigned vehicles
    /// followed by the company's public ones, without duplicates.
    pub async fn list_accessible_vehicles(&self, actor: &Actor) -> FleetResult<Vec<Vehicle>> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        let company_id = tenant_of(&profile)?;
        let in_company = Query::by(fields::COMPANY_ID, company_id.as_str());

        if profile.is_admin() {
            return Ok(tx.find::<Vehicle>(&in_company).await?);
        }

        let assignments = tx
            .find::<VehicleAssignment>(&Query::by(fields::USER_ID, profile.user_id.as_str()))
            .await?;
        let mut seen = HashSet::new();
        let mut vehicles = Vec::new();
        for assignment in assignments {
            if let Some(vehicle) = tx.fetch::<Vehicle>(assignment.vehicle_id.as_str()).await?
                && vehicle.company_id == *company_id
                && seen.insert(vehicle.id.clone())
            {
                vehicles.push(vehicle);
            }
        }
        let public = tx
            .find::<Vehicle>(&in_company.equals(fields::IS_PUBLIC, true))
            .await?;
        for vehicle in public {
            if seen.insert(vehicle.id.clone()) {
                vehicles.push(vehicle);
            }
        }
        Ok(vehicles)
    }

    /// Loads a vehicle the caller may read.
    pub async fn get_vehicle(&self, actor: &Actor, vehicle_id: &VehicleId) -> FleetResult<Vehicle> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        check_vehicle_access(&*tx, &profile, vehicle_id, Operation::Read).await
    }
}
