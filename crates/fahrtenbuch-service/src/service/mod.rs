//! Resource mutators.
//!
//! [`FleetService`] is split by resource across the submodules; each file
//! adds an `impl FleetService` block. Writes go through one
//! `begin_transaction` per operation and are committed last, so any early
//! return drops the transaction and discards its writes.

mod assignment;
mod attachment;
mod company;
mod invite;
mod profile;
mod trip;
mod vehicle;

use fahrtenbuch_auth::{AccessConfig, DenyReason, InviteProtocol};
use fahrtenbuch_core::{CompanyId, FleetError, FleetResult, UserProfile, now_utc};
use fahrtenbuch_storage::{DynBlobStore, DynStore, StorageError};

/// Entry point for every fleet logbook operation.
#[derive(Clone)]
pub struct FleetService {
    store: DynStore,
    blobs: DynBlobStore,
    access: AccessConfig,
    invites: InviteProtocol,
}

impl FleetService {
    pub fn new(store: DynStore, blobs: DynBlobStore, access: AccessConfig) -> Self {
        let invites = InviteProtocol::new(access.clone());
        Self {
            store,
            blobs,
            access,
            invites,
        }
    }

    pub fn store(&self) -> &DynStore {
        &self.store
    }

    pub fn access_config(&self) -> &AccessConfig {
        &self.access
    }
}

impl std::fmt::Debug for FleetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetService")
            .field("backend", &self.store.backend_name())
            .field("access", &self.access)
            .finish()
    }
}

/// The company a profile is bound to, or a `no-tenant` denial.
pub(crate) fn tenant_of(profile: &UserProfile) -> FleetResult<&CompanyId> {
    profile.company_id.as_ref().ok_or_else(|| {
        tracing::debug!(user_id = %profile.user_id, "profile has no company");
        DenyReason::NoTenant.into()
    })
}

/// Maps a unique index violation to a domain error; other failures pass through.
pub(crate) fn on_unique_violation<T>(
    result: Result<T, StorageError>,
    conflict: impl FnOnce() -> FleetError,
) -> FleetResult<T> {
    match result {
        Err(err) if err.is_unique_violation() => Err(conflict()),
        other => Ok(other?),
    }
}

pub(crate) fn current_year() -> i32 {
    now_utc().year()
}
