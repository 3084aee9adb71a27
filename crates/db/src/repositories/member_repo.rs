//! Repository for the `members` table.

use chrono::NaiveDate;
use rendezvous_core::directory::{DirectoryFilter, OrderBy};
use rendezvous_core::pagination::Page;
use rendezvous_core::profile::ProfilePatch;
use rendezvous_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::member::{CreateMember, Member, MemberDetail, MemberSummary, MemberSummaryRow};
use crate::repositories::PhotoRepo;
use crate::unit_of_work::UnitOfWork;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, known_as, gender, date_of_birth, introduction, \
                       looking_for, interests, city, country, created_at, last_active, updated_at";

/// Directory filter predicate. `$4` may be NULL to list every gender.
const DIRECTORY_WHERE: &str = "m.username <> $1 \
                               AND m.date_of_birth BETWEEN $2 AND $3 \
                               AND ($4::TEXT IS NULL OR m.gender = $4)";

fn order_clause(order_by: OrderBy) -> &'static str {
    match order_by {
        OrderBy::LastActive => "m.last_active DESC, m.id DESC",
        OrderBy::Created => "m.created_at DESC, m.id DESC",
    }
}

/// Member lookups, the directory query and profile patches.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a member, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (username, known_as, gender, date_of_birth, city, country)
             VALUES ($1, $2, lower($3), $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&input.username)
            .bind(&input.known_as)
            .bind(&input.gender)
            .bind(input.date_of_birth)
            .bind(&input.city)
            .bind(&input.country)
            .fetch_one(pool)
            .await
    }

    /// Find a member by username (exact match).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE username = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Stored gender for a username, if the member exists.
    pub async fn find_gender(pool: &PgPool, username: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT gender FROM members WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(gender,)| gender))
    }

    /// Member profile together with their gallery.
    pub async fn find_detail(
        pool: &PgPool,
        username: &str,
        today: NaiveDate,
    ) -> Result<Option<MemberDetail>, sqlx::Error> {
        let Some(member) = Self::find_by_username(pool, username).await? else {
            return Ok(None);
        };
        let photos = PhotoRepo::list_for_member(pool, member.id).await?;
        Ok(Some(member.into_detail(photos, today)))
    }

    /// Run the directory listing described by `filter`.
    ///
    /// The total count and the page are read with the same predicate inside
    /// one `REPEATABLE READ` snapshot, so the pagination metadata matches the
    /// items even under concurrent writes.
    pub async fn list_directory(
        pool: &PgPool,
        filter: &DirectoryFilter,
        today: NaiveDate,
    ) -> Result<Page<MemberSummary>, sqlx::Error> {
        let gender = filter.gender.as_ref().map(|g| g.as_str());

        let mut snapshot = UnitOfWork::begin(pool).await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(snapshot.conn())
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM members m WHERE {DIRECTORY_WHERE}");
        let (total_count,): (i64,) = sqlx::query_as(&count_query)
            .bind(&filter.exclude_username)
            .bind(filter.min_dob)
            .bind(filter.max_dob)
            .bind(gender)
            .fetch_one(snapshot.conn())
            .await?;

        let page_query = format!(
            "SELECT m.id, m.username, m.known_as, m.gender, m.date_of_birth, \
                    p.url AS photo_url, m.city, m.country, m.created_at, m.last_active \
             FROM members m \
             LEFT JOIN photos p ON p.member_id = m.id AND p.is_main \
             WHERE {DIRECTORY_WHERE} \
             ORDER BY {} \
             LIMIT $5 OFFSET $6",
            order_clause(filter.order_by)
        );
        let rows = sqlx::query_as::<_, MemberSummaryRow>(&page_query)
            .bind(&filter.exclude_username)
            .bind(filter.min_dob)
            .bind(filter.max_dob)
            .bind(gender)
            .bind(filter.page_size)
            .bind(filter.offset())
            .fetch_all(snapshot.conn())
            .await?;
        snapshot.commit().await?;

        let items = rows.into_iter().map(|r| r.into_summary(today)).collect();
        Ok(Page::new(
            items,
            filter.page_number,
            filter.page_size,
            total_count,
        ))
    }

    /// Load a member for writing, holding a row lock until the unit of work
    /// resolves. Concurrent writers to the same member queue behind it.
    pub async fn lock_by_username(
        conn: &mut PgConnection,
        username: &str,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE username = $1 FOR UPDATE");
        sqlx::query_as::<_, Member>(&query)
            .bind(username)
            .fetch_optional(conn)
            .await
    }

    /// Apply a profile patch. Only non-`None` fields are written.
    pub async fn update_profile(
        conn: &mut PgConnection,
        id: DbId,
        patch: &ProfilePatch,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "UPDATE members SET
                known_as = COALESCE($2, known_as),
                introduction = COALESCE($3, introduction),
                looking_for = COALESCE($4, looking_for),
                interests = COALESCE($5, interests),
                city = COALESCE($6, city),
                country = COALESCE($7, country),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(&patch.known_as)
            .bind(&patch.introduction)
            .bind(&patch.looking_for)
            .bind(&patch.interests)
            .bind(&patch.city)
            .bind(&patch.country)
            .fetch_one(conn)
            .await
    }
}
