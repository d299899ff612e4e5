use fahrtenbuch_auth::{
    AccessFacts, Actor, ConsumeOutcome, ConsumeTransition, InviteRequest, Operation,
    ResourceDescriptor, ResourceKind, authorize, profile_for_user, resolve,
};
use fahrtenbuch_core::{FleetError, FleetResult, Invite, InviteId, UserProfile};
use fahrtenbuch_storage::{Query, RecordReader, RecordWriter, fields};

use super::{FleetService, on_unique_violation, tenant_of};

impl FleetService {
    /// Invites a driver into the caller's company. Admin only.
    pub async fn invite_driver(
        &self,
        actor: &Actor,
        email: &str,
        name: &str,
    ) -> FleetResult<Invite> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        let company_id = tenant_of(&profile)?.clone();
        authorize(
            &profile,
            &ResourceDescriptor::in_company(ResourceKind::Invite, &company_id),
            Operation::Create,
            &AccessFacts::none(),
        )?;

        let canonical = self.invites.canonical_email(email);
        let by_email = Query::by(fields::EMAIL, canonical.as_str());
        let pending = tx.find_first::<Invite>(&by_email).await?;
        let existing_profile = tx.find_first::<UserProfile>(&by_email).await?;

        let request = InviteRequest {
            email: email.to_string(),
            name: name.to_string(),
            company_id,
            invited_by: profile.user_id.clone(),
        };
        let invite = self.invites.evaluate_create(
            request,
            pending.as_ref(),
            existing_profile.as_ref(),
        )?;

        on_unique_violation(tx.insert_record(&invite).await, || {
            FleetError::duplicate_invite(invite.email.clone())
        })?;
        tx.commit().await?;

        tracing::info!(
            invite_id = %invite.id,
            company_id = %invite.company_id,
            "driver invited"
        );
        Ok(invite)
    }

    /// Invites of the caller's company that were not consumed yet. Admin only.
    pub async fn list_pending_invites(&self, actor: &Actor) -> FleetResult<Vec<Invite>> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        let company_id = tenant_of(&profile)?;
        authorize(
            &profile,
            &ResourceDescriptor::in_company(ResourceKind::Invite, company_id),
            Operation::List,
            &AccessFacts::none(),
        )?;
        let query = Query::by(fields::COMPANY_ID, company_id.as_str()).descending();
        Ok(tx.find::<Invite>(&query).await?)
    }

    /// Withdraws a pending invite of the caller's company. Admin only.
    pub async fn revoke_invite(&self, actor: &Actor, invite_id: &InviteId) -> FleetResult<()> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        let invite = tx
            .fetch::<Invite>(invite_id.as_str())
            .await?
            .ok_or_else(|| FleetError::not_found("invite", invite_id.as_str()))?;
        authorize(
            &profile,
            &ResourceDescriptor::invite(&invite),
            Operation::Delete,
            &AccessFacts::none(),
        )?;
        tx.delete_record::<Invite>(invite_id.as_str()).await?;
        tx.commit().await?;

        tracing::info!(invite_id = %invite_id, "invite revoked");
        Ok(())
    }

    /// Binds the caller to the company that invited their verified e-mail.
    ///
    /// The profile insert and the invite delete commit together. Calling
    /// again after success returns [`ConsumeOutcome::AlreadyBound`].
    pub async fn consume_invite(&self, actor: &Actor) -> FleetResult<ConsumeOutcome> {
        let user_id = actor.require_user_id()?;

        let mut tx = self.store.begin_transaction().await?;
        let existing = profile_for_user(&*tx, user_id).await?;
        let pending = match (&existing, actor.verified_email.as_deref()) {
            (None, Some(email)) => {
                let canonical = self.invites.canonical_email(email);
                tx.find_first::<Invite>(&Query::by(fields::EMAIL, canonical.as_str()))
                    .await?
            }
            _ => None,
        };

        let transition = self
            .invites
            .evaluate_consume(user_id, actor.verified_email.as_deref(), existing, pending)
            .inspect_err(|err| {
                tracing::warn!(
                    user_id = %user_id,
                    error = %err,
                    category = %err.category(),
                    "invite consumption rejected"
                );
            })?;

        match transition {
            ConsumeTransition::AlreadyBound(profile) => {
                tx.rollback().await?;
                Ok(ConsumeOutcome::AlreadyBound(profile))
            }
            ConsumeTransition::Bind { profile, consumed } => {
                on_unique_violation(tx.insert_record(&profile).await, || {
                    FleetError::duplicate_profile(profile.email.clone())
                })?;
                tx.delete_record::<Invite>(consumed.id.as_str()).await?;
                tx.commit().await?;

                tracing::info!(
                    user_id = %user_id,
                    company_id = %consumed.company_id,
                    "invite consumed"
                );
                Ok(ConsumeOutcome::Created(profile))
            }
        }
    }
}
