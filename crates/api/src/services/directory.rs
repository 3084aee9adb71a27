//! Directory listing and single-member lookup.

use rendezvous_core::directory::{resolve_filter, MemberParams};
use rendezvous_core::error::CoreError;
use rendezvous_core::gender::{CounterpartPolicy, Gender};
use rendezvous_core::pagination::Page;
use rendezvous_db::models::member::{MemberDetail, MemberSummary};
use rendezvous_db::repositories::MemberRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// List members visible to `requester`.
///
/// When `params.gender` is empty the requester's own gender is looked up and
/// `policy` chooses the default. An unknown requester simply gets no
/// default gender filter.
pub async fn list_members(
    pool: &PgPool,
    policy: &dyn CounterpartPolicy,
    requester: &str,
    params: &MemberParams,
) -> AppResult<Page<MemberSummary>> {
    let requester_gender = MemberRepo::find_gender(pool, requester)
        .await?
        .as_deref()
        .and_then(Gender::parse);

    if requester_gender.is_none() {
        tracing::debug!(requester, "Requester gender unknown; no default gender filter");
    }

    let today = chrono::Utc::now().date_naive();
    let filter = resolve_filter(requester, requester_gender.as_ref(), params, policy, today)?;

    tracing::debug!(
        requester,
        gender = filter.gender.as_ref().map(|g| g.as_str()),
        page = filter.page_number,
        page_size = filter.page_size,
        "Listing directory",
    );

    Ok(MemberRepo::list_directory(pool, &filter, today).await?)
}

/// Fetch one member's public profile.
pub async fn get_member(pool: &PgPool, username: &str) -> AppResult<MemberDetail> {
    let today = chrono::Utc::now().date_naive();
    MemberRepo::find_detail(pool, username, today)
        .await?
        .ok_or_else(|| CoreError::member_not_found(username).into())
}
