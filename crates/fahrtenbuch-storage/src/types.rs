//! Storage types for the document store abstraction layer.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Named collections of the fleet logbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Companies,
    Users,
    UserProfiles,
    Vehicles,
    VehicleAssignments,
    Trips,
    TripAttachments,
    Invites,
}

impl Collection {
    /// Collection name as used by storage backends.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Users => "users",
            Self::UserProfiles => "user_profiles",
            Self::Vehicles => "vehicles",
            Self::VehicleAssignments => "vehicle_assignments",
            Self::Trips => "trips",
            Self::TripAttachments => "trip_attachments",
            Self::Invites => "invites",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document as stored in the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// The document ID (mirrors the `id` field of the content).
    pub id: String,
    /// The collection the document lives in.
    pub collection: Collection,
    /// The full document content as JSON.
    pub document: Value,
    /// Monotonic insertion sequence; defines creation order.
    pub sequence: u64,
    /// When the document was inserted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the document was last written.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl StoredDocument {
    /// Creates a new `StoredDocument`.
    #[must_use]
    pub fn new(
        collection: Collection,
        id: impl Into<String>,
        document: Value,
        sequence: u64,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            collection,
            document,
            sequence,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with replaced content and a fresh `updated_at`.
    #[must_use]
    pub fn with_document(&self, document: Value) -> Self {
        Self {
            document,
            updated_at: OffsetDateTime::now_utc(),
            ..self.clone()
        }
    }
}

/// A single field predicate of a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value.
    Eq(String, Value),
    /// Field is greater than or equal to the value.
    Gte(String, Value),
    /// Field is less than or equal to the value.
    Lte(String, Value),
}

impl Filter {
    /// Evaluates the predicate against a document.
    ///
    /// Range predicates only compare strings with strings and numbers with
    /// numbers; anything else does not match.
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Self::Eq(field, expected) => document.get(field) == Some(expected),
            Self::Gte(field, bound) => document
                .get(field)
                .and_then(|v| compare(v, bound))
                .is_some_and(|o| o != Ordering::Less),
            Self::Lte(field, bound) => document
                .get(field)
                .and_then(|v| compare(v, bound))
                .is_some_and(|o| o != Ordering::Greater),
        }
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}

/// Result ordering by creation sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Parameters for an indexed collection query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Predicates that must all hold.
    pub filters: Vec<Filter>,
    /// Ordering by creation sequence.
    pub order: SortOrder,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl Query {
    /// Creates an unfiltered query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single equality query.
    #[must_use]
    pub fn by(field: &str, value: impl Into<Value>) -> Self {
        Self::new().equals(field, value)
    }

    /// Adds an equality predicate.
    #[must_use]
    pub fn equals(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.to_string(), value.into()));
        self
    }

    /// Adds a lower-bound predicate.
    #[must_use]
    pub fn gte(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(field.to_string(), value.into()));
        self
    }

    /// Adds an upper-bound predicate.
    #[must_use]
    pub fn lte(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte(field.to_string(), value.into()));
        self
    }

    /// Returns newest documents first.
    #[must_use]
    pub fn descending(mut self) -> Self {
        self.order = SortOrder::Descending;
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` if every predicate holds for the document.
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_and_range_filters() {
        let doc = json!({"companyId": "c1", "date": "2024-05-02", "kmEnd": 120});
        assert!(Query::by("companyId", "c1").matches(&doc));
        assert!(!Query::by("companyId", "c2").matches(&doc));
        assert!(
            Query::new()
                .gte("date", "2024-05-01")
                .lte("date", "2024-05-02")
                .matches(&doc)
        );
        assert!(!Query::new().gte("date", "2024-05-03").matches(&doc));
        assert!(Query::new().lte("kmEnd", 120).matches(&doc));
    }

    #[test]
    fn test_range_on_mismatched_types_never_matches() {
        let doc = json!({"date": 5});
        assert!(!Query::new().gte("date", "2024-01-01").matches(&doc));
        assert!(!Query::new().gte("missing", "a").matches(&doc));
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::VehicleAssignments.to_string(), "vehicle_assignments");
    }
}
