//! Collection schema: document field names and secondary indexes.
//!
//! Backends use the unique indexes to reject a write that would create a
//! second document with the same key inside the same commit.

use serde_json::Value;

use crate::types::Collection;

/// Document field names used by queries and indexes.
pub mod fields {
    pub const ID: &str = "id";
    pub const COMPANY_ID: &str = "companyId";
    pub const USER_ID: &str = "userId";
    pub const VEHICLE_ID: &str = "vehicleId";
    pub const TRIP_ID: &str = "tripId";
    pub const EMAIL: &str = "email";
    pub const DATE: &str = "date";
    pub const LICENSE_PLATE: &str = "licensePlate";
    pub const IS_PUBLIC: &str = "isPublic";
}

/// A secondary index over one or more document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDefinition {
    pub collection: Collection,
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub unique: bool,
}

impl IndexDefinition {
    const fn new(
        collection: Collection,
        name: &'static str,
        fields: &'static [&'static str],
        unique: bool,
    ) -> Self {
        Self {
            collection,
            name,
            fields,
            unique,
        }
    }

    /// Index key of a document, or `None` if any indexed field is absent.
    #[must_use]
    pub fn key(&self, document: &Value) -> Option<Vec<Value>> {
        self.fields
            .iter()
            .map(|f| document.get(*f).filter(|v| !v.is_null()).cloned())
            .collect()
    }
}

use fields::*;

/// All indexes of the fleet logbook schema.
pub const INDEXES: &[IndexDefinition] = &[
    IndexDefinition::new(Collection::Vehicles, "by_company", &[COMPANY_ID], false),
    IndexDefinition::new(Collection::Vehicles, "by_license_plate", &[LICENSE_PLATE], false),
    IndexDefinition::new(Collection::VehicleAssignments, "by_user", &[USER_ID], false),
    IndexDefinition::new(Collection::VehicleAssignments, "by_vehicle", &[VEHICLE_ID], false),
    IndexDefinition::new(
        Collection::VehicleAssignments,
        "by_user_and_vehicle",
        &[USER_ID, VEHICLE_ID],
        true,
    ),
    IndexDefinition::new(Collection::Trips, "by_user", &[USER_ID], false),
    IndexDefinition::new(Collection::Trips, "by_vehicle", &[VEHICLE_ID], false),
    IndexDefinition::new(Collection::Trips, "by_company", &[COMPANY_ID], false),
    IndexDefinition::new(Collection::Trips, "by_date", &[DATE], false),
    IndexDefinition::new(Collection::Trips, "by_vehicle_and_date", &[VEHICLE_ID, DATE], false),
    IndexDefinition::new(Collection::TripAttachments, "by_trip", &[TRIP_ID], false),
    IndexDefinition::new(Collection::UserProfiles, "by_user", &[USER_ID], true),
    IndexDefinition::new(Collection::UserProfiles, "by_company", &[COMPANY_ID], false),
    IndexDefinition::new(Collection::UserProfiles, "by_email", &[EMAIL], false),
    IndexDefinition::new(Collection::Users, "by_email", &[EMAIL], false),
    IndexDefinition::new(Collection::Invites, "by_email", &[EMAIL], true),
];

/// Unique indexes declared for a collection.
pub fn unique_indexes(collection: Collection) -> impl Iterator<Item = &'static IndexDefinition> {
    INDEXES
        .iter()
        .filter(move |idx| idx.collection == collection && idx.unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unique_indexes() {
        let names: Vec<_> = unique_indexes(Collection::VehicleAssignments)
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["by_user_and_vehicle"]);
        assert_eq!(unique_indexes(Collection::Trips).count(), 0);
    }

    #[test]
    fn test_index_key_requires_all_fields() {
        let idx = unique_indexes(Collection::VehicleAssignments).next().unwrap();
        let doc = json!({"userId": "u1", "vehicleId": "v1"});
        assert_eq!(idx.key(&doc), Some(vec![json!("u1"), json!("v1")]));
        assert_eq!(idx.key(&json!({"userId": "u1"})), None);
        assert_eq!(idx.key(&json!({"userId": "u1", "vehicleId": null})), None);
    }
}
