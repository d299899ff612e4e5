use serde::{Deserialize, Serialize};

use super::require_non_empty;
use crate::error::FleetResult;
use crate::id::CompanyId;

/// A company: the root tenant boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub is_rental_company: bool,
}

/// Mutable company fields, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    pub name: String,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub is_rental_company: bool,
}

impl CompanyDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> FleetResult<()> {
        require_non_empty("company name", &self.name)
    }

    /// Materializes a new company with a fresh id.
    pub fn into_company(self) -> Company {
        Company {
            id: CompanyId::generate(),
            name: self.name,
            address: self.address,
            industry: self.industry,
            is_rental_company: self.is_rental_company,
        }
    }
}
