//! Profile field updates.

use rendezvous_core::error::CoreError;
use rendezvous_core::profile::ProfilePatch;
use rendezvous_db::repositories::MemberRepo;
use rendezvous_db::unit_of_work::UnitOfWork;
use sqlx::PgPool;

use crate::error::{persistence, AppResult};

const UPDATE_FAILED: &str = "Failed to update";
const NOTHING_TO_UPDATE: &str = "No profile fields to update";

/// Merge `patch` onto `username`'s profile. Photos are untouched.
///
/// A patch with no recognized fields is rejected rather than committed as
/// a no-op.
pub async fn update_profile(pool: &PgPool, username: &str, patch: &ProfilePatch) -> AppResult<()> {
    if patch.is_empty() {
        return Err(CoreError::Validation(NOTHING_TO_UPDATE.into()).into());
    }
    patch.check()?;

    let mut uow = UnitOfWork::begin(pool).await.map_err(persistence(UPDATE_FAILED))?;

    let member = MemberRepo::lock_by_username(uow.conn(), username)
        .await
        .map_err(persistence(UPDATE_FAILED))?
        .ok_or_else(|| CoreError::member_not_found(username))?;

    MemberRepo::update_profile(uow.conn(), member.id, patch)
        .await
        .map_err(persistence(UPDATE_FAILED))?;

    uow.commit().await.map_err(persistence(UPDATE_FAILED))?;

    tracing::info!(username, member_id = member.id, "Profile updated");
    Ok(())
}
