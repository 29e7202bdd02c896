//! Phone entity model.

use regimport_core::types::DbId;
use sqlx::FromRow;

/// A row from the `phone` table.
#[derive(Debug, Clone, FromRow)]
pub struct Phone {
    pub id: DbId,
    pub phone: String,
    pub company_id: DbId,
}
