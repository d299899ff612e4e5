//! Invite-based onboarding.
//!
//! Per e-mail address an invite moves `NoInvite -> Pending -> Consumed`.
//! The functions here only decide the transition from the records the caller
//! loaded; the caller applies it inside one write transaction so that the
//! profile insert and the invite delete commit together.

use fahrtenbuch_core::{
    CompanyId, FleetError, FleetResult, Invite, Role, UserId, UserProfile,
};

use crate::config::AccessConfig;

/// A request to invite a driver into a company.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteRequest {
    pub email: String,
    pub name: String,
    pub company_id: CompanyId,
    pub invited_by: UserId,
}

/// Transition decided for a consume call.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumeTransition {
    /// The caller already has a profile; nothing to write.
    AlreadyBound(UserProfile),
    /// Insert `profile` and delete `consumed`, atomically.
    Bind {
        profile: UserProfile,
        consumed: Invite,
    },
}

/// Result of consuming an invite, as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumeOutcome {
    /// A driver profile was created from the invite.
    Created(UserProfile),
    /// The caller was already bound; retries end up here.
    AlreadyBound(UserProfile),
}

impl ConsumeOutcome {
    pub fn profile(&self) -> &UserProfile {
        match self {
            Self::Created(profile) | Self::AlreadyBound(profile) => profile,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Invite creation and consumption rules.
#[derive(Debug, Clone, Default)]
pub struct InviteProtocol {
    config: AccessConfig,
}

impl InviteProtocol {
    pub fn new(config: AccessConfig) -> Self {
        Self { config }
    }

    /// The form under which an e-mail is stored and looked up.
    pub fn canonical_email(&self, email: &str) -> String {
        self.config.canonical_email(email)
    }

    /// `NoInvite -> Pending`.
    ///
    /// `pending` and `existing_profile` are the invite and profile currently
    /// stored under the canonical form of `request.email`.
    pub fn evaluate_create(
        &self,
        request: InviteRequest,
        pending: Option<&Invite>,
        existing_profile: Option<&UserProfile>,
    ) -> FleetResult<Invite> {
        let email = self.canonical_email(&request.email);
        if email.trim().is_empty() || !email.contains('@') {
            return Err(FleetError::validation(format!(
                "'{}' is not a valid e-mail address",
                request.email
            )));
        }
        if request.name.trim().is_empty() {
            return Err(FleetError::validation("driver name must not be empty"));
        }
        if pending.is_some() {
            return Err(FleetError::duplicate_invite(email));
        }
        if existing_profile.is_some() {
            return Err(FleetError::duplicate_profile(email));
        }
        Ok(Invite::new(
            email,
            request.name.trim(),
            request.company_id,
            request.invited_by,
        ))
    }

    /// `Pending -> Consumed`.
    ///
    /// An existing profile short-circuits to [`ConsumeTransition::AlreadyBound`]
    /// so that retried calls succeed without side effects.
    pub fn evaluate_consume(
        &self,
        user_id: &UserId,
        verified_email: Option<&str>,
        existing_profile: Option<UserProfile>,
        pending: Option<Invite>,
    ) -> FleetResult<ConsumeTransition> {
        if let Some(profile) = existing_profile {
            return Ok(ConsumeTransition::AlreadyBound(profile));
        }
        let email = verified_email
            .map(|e| self.canonical_email(e))
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| FleetError::validation("User must have an email"))?;
        let invite = pending
            .filter(|invite| invite.email == email)
            .ok_or_else(|| FleetError::no_matching_invite(email.clone()))?;

        let profile = UserProfile::new(
            user_id.clone(),
            Some(invite.company_id.clone()),
            Role::Driver,
            invite.name.clone(),
            email,
        );
        Ok(ConsumeTransition::Bind {
            profile,
            consumed: invite,
        })
    }
}
