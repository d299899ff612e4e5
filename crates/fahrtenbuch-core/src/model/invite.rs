use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::id::{CompanyId, InviteId, UserId};
use crate::time::now_utc;

/// A pending, single-use onboarding token binding an e-mail to a future
/// driver profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: InviteId,
    pub email: String,
    pub name: String,
    pub company_id: CompanyId,
    pub invited_by: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub invited_at: OffsetDateTime,
}

impl Invite {
    /// Creates an invite; `email` is stored as given.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        company_id: CompanyId,
        invited_by: UserId,
    ) -> Self {
        Self {
            id: InviteId::generate(),
            email: email.into(),
            name: name.into(),
            company_id,
            invited_by,
            invited_at: now_utc(),
        }
    }
}
