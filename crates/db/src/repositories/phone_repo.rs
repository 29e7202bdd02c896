//! Repository for the `phone` table.

use regimport_core::types::DbId;
use sqlx::PgPool;

use crate::models::phone::Phone;

const COLUMNS: &str = "id, phone, company_id";

pub struct PhoneRepo;

impl PhoneRepo {
    /// Insert one phone for a company inside an open transaction.
    pub(crate) async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        company_id: DbId,
        phone: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO phone (phone, company_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(phone)
        .bind(company_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// List a company's phones in insertion order.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Phone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM phone WHERE company_id = $1 ORDER BY id");
        sqlx::query_as::<_, Phone>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM phone")
            .fetch_one(pool)
            .await
    }
}
