//! Tenant policy evaluation.
//!
//! [`decide`] is a pure function of the acting profile, the resource
//! descriptor, the operation and the gathered facts. Rules are evaluated in
//! precedence order and the first match wins:
//!
//! 1. deny when the profile has no company and the kind needs tenant scope
//! 2. allow a tenant admin inside their own company
//! 3. allow the owner of a self-owned resource
//! 4. allow vehicle read/use to a same-tenant driver with an assignment or a
//!    public vehicle
//! 5. deny
//!
//! # Example
//!
//! ```ignore
//! use fahrtenbuch_auth::policy::{AccessFacts, Operation, ResourceDescriptor, decide};
//!
//! let descriptor = ResourceDescriptor::vehicle(&vehicle);
//! let decision = decide(&profile, &descriptor, Operation::Read, &facts);
//! if decision.is_allowed() {
//!     // Proceed with request
//! }
//! ```

use fahrtenbuch_core::{FleetError, FleetResult, UserProfile};

use super::context::{AccessFacts, GrantClass, Operation, ResourceDescriptor};

// =============================================================================
// Access Decision
// =============================================================================

/// Result of policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is granted.
    Allow,
    /// Access is denied with a reason.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns `true` if access was granted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Get the deny reason if access was denied.
    #[must_use]
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Deny(reason) => Some(*reason),
            Self::Allow => None,
        }
    }
}

// =============================================================================
// Deny Reason
// =============================================================================

/// Internal reason for a denial.
///
/// Reasons are logged and carried inside `FleetError::NotAuthorized`, but the
/// error's display text is the same for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// The profile is not bound to any company.
    NoTenant,
    /// The resource belongs to another company.
    CrossTenant,
    /// The operation needs the admin role.
    AdminRequired,
    /// The resource is owned by someone else.
    NotOwner,
    /// No assignment and the vehicle is not public.
    NoVehicleGrant,
}

impl DenyReason {
    /// Stable code for logs.
    pub fn code(self) -> &'static str {
        match self {
            Self::NoTenant => "no-tenant",
            Self::CrossTenant => "cross-tenant",
            Self::AdminRequired => "admin-required",
            Self::NotOwner => "not-owner",
            Self::NoVehicleGrant => "no-vehicle-grant",
        }
    }
}

impl From<DenyReason> for FleetError {
    fn from(reason: DenyReason) -> Self {
        FleetError::not_authorized(reason.code())
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates the tenant policy.
pub fn decide(
    profile: &UserProfile,
    resource: &ResourceDescriptor,
    operation: Operation,
    facts: &AccessFacts,
) -> AccessDecision {
    let kind = resource.kind;

    let Some(profile_company) = profile.company_id.as_ref() else {
        if kind.requires_tenant_scope() {
            return AccessDecision::Deny(DenyReason::NoTenant);
        }
        return owner_or_deny(profile, resource);
    };
    let same_tenant = resource.company_id.as_ref() == Some(profile_company);

    if profile.is_admin() && same_tenant && kind.grants_class(GrantClass::TenantAdmin) {
        return AccessDecision::Allow;
    }

    if let AccessDecision::Allow = owner_or_deny(profile, resource) {
        return AccessDecision::Allow;
    }

    if kind.grants_class(GrantClass::VehicleUsage)
        && operation.is_vehicle_usage()
        && same_tenant
        && (facts.assignment_exists || facts.vehicle_is_public)
    {
        return AccessDecision::Allow;
    }

    AccessDecision::Deny(fallback_reason(profile, resource, operation, same_tenant))
}

fn owner_or_deny(profile: &UserProfile, resource: &ResourceDescriptor) -> AccessDecision {
    if resource.kind.grants_class(GrantClass::SelfOwnership)
        && resource.owner_id.as_ref() == Some(&profile.user_id)
    {
        AccessDecision::Allow
    } else if profile.company_id.is_none() {
        AccessDecision::Deny(DenyReason::NoTenant)
    } else {
        AccessDecision::Deny(DenyReason::NotOwner)
    }
}

fn fallback_reason(
    profile: &UserProfile,
    resource: &ResourceDescriptor,
    operation: Operation,
    same_tenant: bool,
) -> DenyReason {
    let kind = resource.kind;
    if !same_tenant {
        DenyReason::CrossTenant
    } else if kind.grants_class(GrantClass::VehicleUsage) && operation.is_vehicle_usage() {
        DenyReason::NoVehicleGrant
    } else if kind.grants_class(GrantClass::SelfOwnership) && !profile.is_admin() {
        DenyReason::NotOwner
    } else {
        DenyReason::AdminRequired
    }
}

/// Evaluates the policy and turns a denial into `NotAuthorized`.
///
/// Every denial is logged at debug level with its reason code.
pub fn authorize(
    profile: &UserProfile,
    resource: &ResourceDescriptor,
    operation: Operation,
    facts: &AccessFacts,
) -> FleetResult<()> {
    match decide(profile, resource, operation, facts) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny(reason) => {
            tracing::debug!(
                user_id = %profile.user_id,
                kind = %resource.kind,
                operation = %operation,
                reason = reason.code(),
                "access denied"
            );
            Err(reason.into())
        }
    }
}
