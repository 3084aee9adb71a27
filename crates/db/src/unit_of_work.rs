//! Explicit transaction boundary for write operations and consistent reads.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// All changes made through [`UnitOfWork::conn`] become visible together on
/// [`commit`](UnitOfWork::commit). Dropping an uncommitted unit of work
/// rolls it back, so every early return leaves the store untouched.
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl UnitOfWork {
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// Connection bound to this unit of work.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await.inspect_err(|e| {
            tracing::error!(error = %e, "unit of work commit failed");
        })
    }
}
