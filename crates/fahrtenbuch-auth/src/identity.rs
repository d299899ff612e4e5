//! Identity resolution.
//!
//! The request layer authenticates the caller and hands over an [`Actor`].
//! Everything downstream receives the actor explicitly; there is no ambient
//! session.

use fahrtenbuch_core::{FleetError, FleetResult, UserId, UserProfile};
use fahrtenbuch_storage::{Query, ReadTransaction, RecordReader, fields};

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    /// Stable user id issued by the auth provider.
    pub user_id: Option<UserId>,
    /// E-mail address verified by the auth provider.
    pub verified_email: Option<String>,
}

impl Actor {
    /// A caller without any identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            verified_email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.verified_email = Some(email.into());
        self
    }

    /// Returns the user id or fails with `Unauthenticated`.
    pub fn require_user_id(&self) -> FleetResult<&UserId> {
        self.user_id.as_ref().ok_or(FleetError::Unauthenticated)
    }
}

/// Loads the profile bound to a user, if any.
pub async fn profile_for_user<T>(tx: &T, user_id: &UserId) -> FleetResult<Option<UserProfile>>
where
    T: ReadTransaction + ?Sized,
{
    let query = Query::by(fields::USER_ID, user_id.as_str());
    Ok(tx.find_first::<UserProfile>(&query).await?)
}

/// Resolves the actor's profile.
///
/// Fails with `Unauthenticated` without a user id and with `ProfileNotFound`
/// when no profile is bound yet.
pub async fn resolve<T>(tx: &T, actor: &Actor) -> FleetResult<UserProfile>
where
    T: ReadTransaction + ?Sized,
{
    resolve_optional(tx, actor)
        .await?
        .ok_or(FleetError::ProfileNotFound)
}

/// Like [`resolve`], but treats a missing profile as `None`.
pub async fn resolve_optional<T>(tx: &T, actor: &Actor) -> FleetResult<Option<UserProfile>>
where
    T: ReadTransaction + ?Sized,
{
    let user_id = actor.require_user_id()?;
    profile_for_user(tx, user_id).await
}

#[cfg(test)]
mod tests {
    use fahrtenbuch_core::ErrorKind;

    use super::*;

    #[test]
    fn test_anonymous_actor_is_unauthenticated() {
        let err = Actor::anonymous().require_user_id().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_actor_builder() {
        let actor = Actor::user("u1").with_email("a@b.de");
        assert_eq!(actor.require_user_id().unwrap().as_str(), "u1");
        assert_eq!(actor.verified_email.as_deref(), Some("a@b.de"));
    }
}
