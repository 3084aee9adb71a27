//! Repository for the `photos` table.

use rendezvous_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::photo::{CreatePhoto, Photo};

const COLUMNS: &str = "id, member_id, url, public_id, is_main, created_at";

/// Gallery reads and writes.
pub struct PhotoRepo;

impl PhotoRepo {
    /// All photos owned by a member, oldest first.
    pub async fn list_for_member<'e, E>(executor: E, member_id: DbId) -> Result<Vec<Photo>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM photos WHERE member_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(member_id)
            .fetch_all(executor)
            .await
    }

    /// Insert an uploaded photo.
    pub async fn insert(conn: &mut PgConnection, input: &CreatePhoto) -> Result<Photo, sqlx::Error> {
        let query = format!(
            "INSERT INTO photos (member_id, url, public_id, is_main)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(input.member_id)
            .bind(&input.url)
            .bind(&input.public_id)
            .bind(input.is_main)
            .fetch_one(conn)
            .await
    }

    /// Move the main flag to `promote`, clearing `demote` first.
    ///
    /// Demotion runs before promotion so the single-main index never sees
    /// two mains within the statement sequence.
    pub async fn swap_main(
        conn: &mut PgConnection,
        member_id: DbId,
        demote: Option<DbId>,
        promote: DbId,
    ) -> Result<(), sqlx::Error> {
        if let Some(current) = demote {
            sqlx::query("UPDATE photos SET is_main = false WHERE id = $1 AND member_id = $2")
                .bind(current)
                .bind(member_id)
                .execute(&mut *conn)
                .await?;
        }

        let result = sqlx::query("UPDATE photos SET is_main = true WHERE id = $1 AND member_id = $2")
            .bind(promote)
            .bind(member_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    /// Delete one of the member's photos. Returns `true` if a row was removed.
    pub async fn delete(
        conn: &mut PgConnection,
        member_id: DbId,
        photo_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1 AND member_id = $2")
            .bind(photo_id)
            .bind(member_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
