use serde::{Deserialize, Serialize};

use crate::id::{CompanyId, ProfileId, UserId};

/// Identity record owned by the external auth provider.
///
/// Only the display fields are ever written from this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            phone: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Role of a profile inside its company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Driver => "driver",
        }
    }
}

/// Binds one user to one company with one role.
///
/// At most one profile exists per user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: ProfileId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    pub role: Role,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn new(
        user_id: UserId,
        company_id: Option<CompanyId>,
        role: Role,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: ProfileId::generate(),
            user_id,
            company_id,
            role,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns `true` if the profile has the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns `true` if the profile belongs to the given company.
    #[must_use]
    pub fn belongs_to(&self, company_id: &CompanyId) -> bool {
        self.company_id.as_ref() == Some(company_id)
    }
}

/// Canonical form of an e-mail address used for invite matching.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Role::Driver).unwrap(),
            serde_json::json!("driver")
        );
    }

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  X@Y.com "), "x@y.com");
    }

    #[test]
    fn profile_membership() {
        let profile = UserProfile {
            id: ProfileId::generate(),
            user_id: UserId::from("u1"),
            company_id: Some(CompanyId::from("c1")),
            role: Role::Admin,
            name: "A".into(),
            email: "a@c1.com".into(),
        };
        assert!(profile.is_admin());
        assert!(profile.belongs_to(&CompanyId::from("c1")));
        assert!(!profile.belongs_to(&CompanyId::from("c2")));
    }
}
