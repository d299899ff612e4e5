//! Access-related configuration.

use serde::{Deserialize, Serialize};

/// Settings consulted by the onboarding rules and the mutators.
///
/// # Example (TOML)
///
/// ```toml
/// [access]
/// normalize_emails = true
/// default_admin_name = "Admin"
/// max_trip_km = 2000.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Trim and lower-case e-mail addresses before storing or matching them.
    pub normalize_emails: bool,

    /// Profile name used when a company founder has no display name.
    pub default_admin_name: String,

    /// Upper bound for the distance of a single trip, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_trip_km: Option<f64>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            normalize_emails: true,
            default_admin_name: "Admin".to_string(),
            max_trip_km: None,
        }
    }
}

impl AccessConfig {
    /// Canonical form of an e-mail address under this configuration.
    pub fn canonical_email(&self, email: &str) -> String {
        if self.normalize_emails {
            fahrtenbuch_core::normalize_email(email)
        } else {
            email.to_string()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.default_admin_name.trim().is_empty() {
            return Err("access.default_admin_name must not be empty".to_string());
        }
        if let Some(max) = self.max_trip_km
            && (!max.is_finite() || max <= 0.0)
        {
            return Err(format!("access.max_trip_km must be positive, got {max}"));
        }
        Ok(())
    }
}
