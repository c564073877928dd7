//! Repository for the `users` table.

use sqlx::PgPool;

use innboard_core::types::DbId;

use crate::models::user::UserRow;

const COLUMNS: &str = "id, name, role, property_ids";

/// Provides row access for reviewer accounts.
pub struct UserRepo;

impl UserRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
