//! Inputs of a policy decision.
//!
//! The engine sees a resource only through a [`ResourceDescriptor`] and the
//! relational [`AccessFacts`] the caller gathered for it.

use std::fmt;

use fahrtenbuch_core::{Company, CompanyId, Invite, Trip, UserId, Vehicle};

// =============================================================================
// Resource Kinds
// =============================================================================

/// Protected resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Company,
    UserProfile,
    Vehicle,
    VehicleAssignment,
    Trip,
    TripAttachment,
    Invite,
}

/// The ways a resource can be granted to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantClass {
    /// An admin may act on everything inside their own company.
    TenantAdmin,
    /// The user recorded as owner may always act on the resource.
    SelfOwnership,
    /// A driver may read and use a vehicle that is assigned to them or public.
    VehicleUsage,
}

impl ResourceKind {
    /// Grant classes that apply to this kind.
    pub fn grants(self) -> &'static [GrantClass] {
        match self {
            Self::Company | Self::UserProfile | Self::VehicleAssignment | Self::Invite => {
                &[GrantClass::TenantAdmin]
            }
            Self::Vehicle => &[GrantClass::TenantAdmin, GrantClass::VehicleUsage],
            Self::Trip | Self::TripAttachment => {
                &[GrantClass::TenantAdmin, GrantClass::SelfOwnership]
            }
        }
    }

    /// Returns `true` if this kind grants the given class.
    pub fn grants_class(self, class: GrantClass) -> bool {
        self.grants().contains(&class)
    }

    /// Returns `true` if acting on this kind needs a company-bound profile.
    ///
    /// Self-owned kinds stay reachable by their owner without one.
    pub fn requires_tenant_scope(self) -> bool {
        !self.grants_class(GrantClass::SelfOwnership)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::UserProfile => "user_profile",
            Self::Vehicle => "vehicle",
            Self::VehicleAssignment => "vehicle_assignment",
            Self::Trip => "trip",
            Self::TripAttachment => "trip_attachment",
            Self::Invite => "invite",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Operations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    /// Log a trip against a vehicle.
    Use,
    Create,
    Update,
    Delete,
    List,
}

impl Operation {
    /// Operations covered by the vehicle usage grant.
    pub fn is_vehicle_usage(self) -> bool {
        matches!(self, Self::Read | Self::Use)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Use => "use",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Resource Descriptor
// =============================================================================

/// What the engine knows about the target resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    /// Owning tenant.
    pub company_id: Option<CompanyId>,
    /// Owning user, for self-owned kinds.
    pub owner_id: Option<UserId>,
}

impl ResourceDescriptor {
    pub fn new(kind: ResourceKind, company_id: Option<CompanyId>) -> Self {
        Self {
            kind,
            company_id,
            owner_id: None,
        }
    }

    #[must_use]
    pub fn owned_by(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// A not-yet-existing resource to be created inside `company_id`.
    pub fn in_company(kind: ResourceKind, company_id: &CompanyId) -> Self {
        Self::new(kind, Some(company_id.clone()))
    }

    pub fn company(company: &Company) -> Self {
        Self::new(ResourceKind::Company, Some(company.id.clone()))
    }

    pub fn vehicle(vehicle: &Vehicle) -> Self {
        Self::new(ResourceKind::Vehicle, Some(vehicle.company_id.clone()))
    }

    /// Assignments inherit the tenant of their vehicle.
    pub fn assignment(vehicle: &Vehicle) -> Self {
        Self::new(
            ResourceKind::VehicleAssignment,
            Some(vehicle.company_id.clone()),
        )
    }

    pub fn trip(trip: &Trip) -> Self {
        Self::new(ResourceKind::Trip, Some(trip.company_id.clone())).owned_by(trip.user_id.clone())
    }

    /// Attachments inherit tenant and owner of their trip.
    pub fn attachment(trip: &Trip) -> Self {
        Self::new(ResourceKind::TripAttachment, Some(trip.company_id.clone()))
            .owned_by(trip.user_id.clone())
    }

    pub fn invite(invite: &Invite) -> Self {
        Self::new(ResourceKind::Invite, Some(invite.company_id.clone()))
    }
}

// =============================================================================
// Facts
// =============================================================================

/// Relational facts gathered by an access checker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessFacts {
    /// An assignment links the acting user to the vehicle.
    pub assignment_exists: bool,
    /// The vehicle is usable by every driver of its company.
    pub vehicle_is_public: bool,
}

impl AccessFacts {
    pub fn none() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_scope_requirement() {
        assert!(ResourceKind::Vehicle.requires_tenant_scope());
        assert!(ResourceKind::Invite.requires_tenant_scope());
        assert!(!ResourceKind::Trip.requires_tenant_scope());
        assert!(!ResourceKind::TripAttachment.requires_tenant_scope());
    }

    #[test]
    fn test_every_kind_declares_a_grant() {
        for kind in [
            ResourceKind::Company,
            ResourceKind::UserProfile,
            ResourceKind::Vehicle,
            ResourceKind::VehicleAssignment,
            ResourceKind::Trip,
            ResourceKind::TripAttachment,
            ResourceKind::Invite,
        ] {
            assert!(!kind.grants().is_empty(), "{kind} has no grant class");
        }
    }
}
