#![allow(dead_code)]

use fahrtenbuch_core::{Company, CompanyDraft, FuelType, TripDraft, User, VehicleDraft};
use fahrtenbuch_service::{Actor, FleetService, config::AppConfig};

pub fn service() -> FleetService {
    FleetService::from_config(&AppConfig::default())
}

pub fn service_with(configure: impl FnOnce(&mut AppConfig)) -> FleetService {
    let mut config = AppConfig::default();
    configure(&mut config);
    FleetService::from_config(&config)
}

pub fn vehicle_draft(plate: &str, is_public: bool) -> VehicleDraft {
    VehicleDraft {
        brand: "Volkswagen".into(),
        model: "Transporter".into(),
        license_plate: plate.into(),
        vin: format!("WV2ZZZ7HZ{plate}"),
        fuel_type: FuelType::Diesel,
        year: 2022,
        mileage: 15_000.0,
        is_public,
        notes: None,
    }
}

pub fn trip_draft(date: &str, km_start: f64, km_end: f64) -> TripDraft {
    TripDraft {
        date: date.into(),
        time_start: "08:00".into(),
        time_end: "10:30".into(),
        location_start: "Berlin".into(),
        location_end: "Leipzig".into(),
        km_start,
        km_end,
        purpose: "Kundenbesuch".into(),
        notes: None,
    }
}

/// A company with its founding admin.
pub struct Tenant {
    pub admin: Actor,
    pub company: Company,
}

pub async fn setup_company(service: &FleetService, admin_id: &str, name: &str) -> Tenant {
    let email = format!("{admin_id}@example.de");
    service
        .record_user(User::new(admin_id).with_name(name).with_email(email.clone()))
        .await
        .unwrap();
    let admin = Actor::user(admin_id).with_email(email);
    let company = service
        .create_company(&admin, CompanyDraft::new(format!("{name} GmbH")))
        .await
        .unwrap();
    Tenant { admin, company }
}

/// Invites `user_id` into the tenant and lets them accept.
pub async fn onboard_driver(service: &FleetService, tenant: &Tenant, user_id: &str) -> Actor {
    let email = format!("{user_id}@example.de");
    service
        .invite_driver(&tenant.admin, &email, user_id)
        .await
        .unwrap();
    let driver = Actor::user(user_id).with_email(email);
    service.consume_invite(&driver).await.unwrap();
    driver
}
