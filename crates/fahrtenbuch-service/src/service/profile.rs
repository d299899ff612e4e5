use fahrtenbuch_auth::{
    AccessFacts, Actor, Operation, ResourceDescriptor, ResourceKind, authorize, profile_for_user,
    resolve,
};
use fahrtenbuch_core::{FleetError, FleetResult, User, UserId, UserProfile};
use fahrtenbuch_storage::{Query, RecordReader, RecordWriter, StorageError, fields};
use serde_json::json;

use super::{FleetService, tenant_of};
use crate::views::CurrentUser;

impl FleetService {
    /// The caller's user record and profile. Anonymous callers get an empty view.
    pub async fn current_user(&self, actor: &Actor) -> FleetResult<CurrentUser> {
        let Some(user_id) = actor.user_id.as_ref() else {
            return Ok(CurrentUser::default());
        };
        let tx = self.store.begin_read().await?;
        let user = tx.fetch::<User>(user_id.as_str()).await?;
        let profile = profile_for_user(&*tx, user_id).await?;
        Ok(CurrentUser { user, profile })
    }

    /// Updates display name and e-mail on the profile (if bound) and the user record.
    pub async fn update_profile(
        &self,
        actor: &Actor,
        name: &str,
        email: &str,
    ) -> FleetResult<UserId> {
        let user_id = actor.require_user_id()?.clone();
        if name.trim().is_empty() {
            return Err(FleetError::validation("name must not be empty"));
        }
        let email = self.access.canonical_email(email);

        let mut tx = self.store.begin_transaction().await?;
        let patch = json!({ "name": name.trim(), "email": email });
        if let Some(profile) = profile_for_user(&*tx, &user_id).await? {
            tx.patch_record::<UserProfile>(profile.id.as_str(), &patch)
                .await?;
        }
        match tx.fetch::<User>(user_id.as_str()).await? {
            Some(_) => {
                tx.patch_record::<User>(user_id.as_str(), &patch).await?;
            }
            None => {
                let user = User::new(user_id.clone())
                    .with_name(name.trim())
                    .with_email(email);
                tx.insert_record(&user).await?;
            }
        }
        tx.commit().await?;

        tracing::info!(user_id = %user_id, "profile updated");
        Ok(user_id)
    }

    /// Stores or refreshes the identity record handed over by the auth provider.
    pub async fn record_user(&self, mut user: User) -> FleetResult<User> {
        user.email = user.email.map(|e| self.access.canonical_email(&e));

        let mut tx = self.store.begin_transaction().await?;
        let stored = if tx.fetch::<User>(user.id.as_str()).await?.is_some() {
            let patch = serde_json::to_value(&user).map_err(StorageError::from)?;
            tx.patch_record::<User>(user.id.as_str(), &patch).await?
        } else {
            tx.insert_record(&user).await?;
            user
        };
        tx.commit().await?;
        Ok(stored)
    }

    /// Profiles of the caller's company. Admin only.
    pub async fn list_company_profiles(&self, actor: &Actor) -> FleetResult<Vec<UserProfile>> {
        let tx = self.store.begin_read().await?;
        let profile = resolve(&*tx, actor).await?;
        let company_id = tenant_of(&profile)?;
        authorize(
            &profile,
            &ResourceDescriptor::in_company(ResourceKind::UserProfile, company_id),
            Operation::List,
            &AccessFacts::none(),
        )?;
        let query = Query::by(fields::COMPANY_ID, company_id.as_str());
        Ok(tx.find::<UserProfile>(&query).await?)
    }
}
