use std::collections::HashMap;

use fahrtenbuch_auth::{
    AccessFacts, Actor, Operation, ResourceDescriptor, ResourceKind, authorize, check_trip_access,
    check_vehicle_access, decide, profile_for_user, resolve,
};
use fahrtenbuch_core::{
    FleetResult, Trip, TripAttachment, TripDraft, TripId, UserId, UserProfile, Vehicle, VehicleId,
};
use fahrtenbuch_storage::{Query, ReadTransaction, RecordReader, RecordWriter, StorageError, fields};

use super::{FleetService, tenant_of};
use crate::views::{TripFilter, TripWithContext, TripWithDriver, TripWithVehicle};

/// Memoizing lookups for enriching trip listings.
#[derive(Default)]
struct Lookups {
    vehicles: HashMap<VehicleId, Option<Vehicle>>,
    drivers: HashMap<UserId, Option<UserProfile>>,
}

impl Lookups {
    async fn vehicle<T>(&mut self, tx: &T, id: &VehicleId) -> FleetResult<Option<Vehicle>>
    where
        T: ReadTransaction + ?Sized,
    {
        if let Some(cached) = self.vehicles.get(id) {
            return Ok(cached.clone());
        }
        let vehicle = tx.fetch::<Vehicle>(id.as_str()).await?;
        self.vehicles.insert(id.clone(), vehicle.clone());
        Ok(vehicle)
    }

    async fn driver<T>(&mut self, tx: &T, id: &UserId) -> FleetResult<Option<UserProfile>>
    where
        T: ReadTransaction + ?Sized,
    {
        if let Some(cached) = self.drivers.get(id) {
            return Ok(cached.clone());
        }
        let profile = profile_for_user(tx, id).await?;
        self.drivers.insert(id.clone(), profile.clone());
        Ok(profile)
    }

    async fn context<T>(&mut self, tx: &T, trip: Trip) -> FleetResult<TripWithContext>
    where
        T: ReadTransaction + ?Sized,
    {
        let vehicle = self.vehicle(tx, &trip.vehicle_id).await?;
        let driver = self.driver(tx, &trip.user_id).await?;
        Ok(TripWithContext {
            trip,
            vehicle,
            driver,
        })
    }
}

impl FleetService {
    /// Logs a trip against a vehicle the caller may use.
    ///
    /// The trip's company is copied from the vehicle.
    pub async fn create_trip(
        &self,
        actor: &Actor,
        vehicle_id: &VehicleId,
        draft: TripDraft,
    ) -> FleetResult<Trip> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        let vehicle = check_vehicle_access(&*tx, &profile, vehicle_id, Operation::Use).await?;
        draft.validate(self.access.max_trip_km)?;

        let trip = draft.into_trip(profile.user_id.clone(), vehicle.id, vehicle.company_id);
        tx.insert_record(&trip).await?;
        tx.commit().await?;

        tracing::info!(
            trip_id = %trip.id,
            vehicle_id = %trip.vehicle_id,
            distance_km = trip.distance_km(),
            "trip logged"
        );
        Ok(trip)
    }

    /// A trip with its vehicle and driver.
    pub async fn get_trip(&self, actor: &Actor, trip_id: &TripId) -> FleetResult<TripWithContext> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        let trip = check_trip_access(&*tx, &profile, trip_id, Operation::Read).await?;
        Lookups::default().context(&*tx, trip).await
    }

    /// Replaces a trip's fields. Vehicle, driver and company stay as they are.
    pub async fn update_trip(
        &self,
        actor: &Actor,
        trip_id: &TripId,
        draft: TripDraft,
    ) -> FleetResult<Trip> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        check_trip_access(&*tx, &profile, trip_id, Operation::Update).await?;
        draft.validate(self.access.max_trip_km)?;

        let patch = serde_json::to_value(&draft).map_err(StorageError::from)?;
        let updated = tx.patch_record::<Trip>(trip_id.as_str(), &patch).await?;
        tx.commit().await?;

        tracing::info!(trip_id = %trip_id, "trip updated");
        Ok(updated)
    }

    /// Deletes a trip together with all of its attachments.
    pub async fn delete_trip(&self, actor: &Actor, trip_id: &TripId) -> FleetResult<()> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        check_trip_access(&*tx, &profile, trip_id, Operation::Delete).await?;

        let attachments = tx
            .delete_records_where::<TripAttachment>(&Query::by(fields::TRIP_ID, trip_id.as_str()))
            .await?;
        tx.delete_record::<Trip>(trip_id.as_str()).await?;
        tx.commit().await?;

        tracing::info!(trip_id = %trip_id, attachments, "trip deleted");
        Ok(())
    }

    /// The caller's own trips, newest first.
    pub async fn list_my_trips(&self, actor: &Actor) -> FleetResult<Vec<TripWithVehicle>> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        let query = Query::by(fields::USER_ID, profile.user_id.as_str()).descending();
        let trips = tx.find::<Trip>(&query).await?;

        let mut lookups = Lookups::default();
        let mut result = Vec::with_capacity(trips.len());
        for trip in trips {
            let vehicle = lookups.vehicle(&*tx, &trip.vehicle_id).await?;
            result.push(TripWithVehicle { trip, vehicle });
        }
        Ok(result)
    }

    /// Trips of one vehicle, newest first.
    ///
    /// Needs read access to the vehicle; entries the caller may not read
    /// themselves are left out, so drivers only see their own.
    pub async fn list_vehicle_trips(
        &self,
        actor: &Actor,
        vehicle_id: &VehicleId,
    ) -> FleetResult<Vec<TripWithDriver>> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        check_vehicle_access(&*tx, &profile, vehicle_id, Operation::Read).await?;

        let query = Query::by(fields::VEHICLE_ID, vehicle_id.as_str()).descending();
        let trips = tx.find::<Trip>(&query).await?;

        let mut lookups = Lookups::default();
        let mut result = Vec::new();
        for trip in trips {
            let readable = decide(
                &profile,
                &ResourceDescriptor::trip(&trip),
                Operation::Read,
                &AccessFacts::none(),
            )
            .is_allowed();
            if readable {
                let driver = lookups.driver(&*tx, &trip.user_id).await?;
                result.push(TripWithDriver { trip, driver });
            }
        }
        Ok(result)
    }

    /// Trips of the caller's company, newest first. Admin only.
    pub async fn list_company_trips(
        &self,
        actor: &Actor,
        filter: TripFilter,
    ) -> FleetResult<Vec<TripWithContext>> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        let company_id = tenant_of(&profile)?;
        authorize(
            &profile,
            &ResourceDescriptor::in_company(ResourceKind::Trip, company_id),
            Operation::List,
            &AccessFacts::none(),
        )?;
        filter.validate()?;

        let mut query = Query::by(fields::COMPANY_ID, company_id.as_str()).descending();
        if let Some(vehicle_id) = &filter.vehicle_id {
            query = query.equals(fields::VEHICLE_ID, vehicle_id.as_str());
        }
        if let Some(user_id) = &filter.user_id {
            query = query.equals(fields::USER_ID, user_id.as_str());
        }
        if let Some(from) = &filter.date_from {
            query = query.gte(fields::DATE, from.as_str());
        }
        if let Some(to) = &filter.date_to {
            query = query.lte(fields::DATE, to.as_str());
        }
        let trips = tx.find::<Trip>(&query).await?;

        let mut lookups = Lookups::default();
        let mut result = Vec::with_capacity(trips.len());
        for trip in trips {
            result.push(lookups.context(&*tx, trip).await?);
        }
        Ok(result)
    }
}
