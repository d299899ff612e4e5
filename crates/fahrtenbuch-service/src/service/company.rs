use fahrtenbuch_auth::{
    AccessFacts, Actor, Operation, ResourceDescriptor, authorize, profile_for_user, resolve,
    resolve_optional,
};
use fahrtenbuch_core::{
    Company, CompanyDraft, CompanyId, FleetError, FleetResult, Role, User, UserProfile,
};
use fahrtenbuch_storage::{RecordReader, RecordWriter, StorageError};
use serde_json::json;

use super::FleetService;

impl FleetService {
    /// Creates a company and makes the caller its admin.
    ///
    /// A caller who already has a profile is rebound to the new company with
    /// the admin role; otherwise an admin profile is created from the user
    /// record.
    pub async fn create_company(&self, actor: &Actor, draft: CompanyDraft) -> FleetResult<Company> {
        let user_id = actor.require_user_id()?.clone();
        draft.validate()?;

        let mut tx = self.store.begin_transaction().await?;
        let company = draft.into_company();
        tx.insert_record(&company).await?;

        match profile_for_user(&*tx, &user_id).await? {
            Some(profile) => {
                let patch = json!({ "companyId": company.id, "role": Role::Admin });
                tx.patch_record::<UserProfile>(profile.id.as_str(), &patch)
                    .await?;
            }
            None => {
                let user = tx.fetch::<User>(user_id.as_str()).await?;
                let name = user
                    .as_ref()
                    .and_then(|u| u.name.clone())
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| self.access.default_admin_name.clone());
                let email = user
                    .and_then(|u| u.email)
                    .or_else(|| actor.verified_email.clone())
                    .map(|e| self.access.canonical_email(&e))
                    .unwrap_or_default();
                let profile = UserProfile::new(
                    user_id.clone(),
                    Some(company.id.clone()),
                    Role::Admin,
                    name,
                    email,
                );
                tx.insert_record(&profile).await?;
            }
        }
        tx.commit().await?;

        tracing::info!(company_id = %company.id, admin = %user_id, "company created");
        Ok(company)
    }

    /// The company the caller is bound to, if any.
    pub async fn company_for_user(&self, actor: &Actor) -> FleetResult<Option<Company>> {
        let tx = self.store.begin_read().await?;
        let Some(company_id) = resolve_optional(&*tx, actor)
            .await?
            .and_then(|p| p.company_id)
        else {
            return Ok(None);
        };
        Ok(tx.fetch::<Company>(company_id.as_str()).await?)
    }

    /// Replaces the company's fields. Admin of that company only.
    pub async fn update_company(
        &self,
        actor: &Actor,
        company_id: &CompanyId,
        draft: CompanyDraft,
    ) -> FleetResult<Company> {
        let mut tx = self.store.begin_transaction().await?;
        let profile = resolve(&*tx, actor).await?;
        let company = tx
            .fetch::<Company>(company_id.as_str())
            .await?
            .ok_or_else(|| FleetError::not_found("company", company_id.as_str()))?;
        authorize(
            &profile,
            &ResourceDescriptor::company(&company),
            Operation::Update,
            &AccessFacts::none(),
        )?;
        draft.validate()?;

        let patch = serde_json::to_value(&draft).map_err(StorageError::from)?;
        let updated = tx
            .patch_record::<Company>(company_id.as_str(), &patch)
            .await?;
        tx.commit().await?;

        tracing::info!(company_id = %company_id, "company updated");
        Ok(updated)
    }
}
