//! User row model.

use sqlx::FromRow;

use innboard_core::store::User;
use innboard_core::types::DbId;

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub property_ids: Vec<DbId>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> User {
        User {
            id: row.id,
            name: row.name,
            role: row.role,
            property_ids: row.property_ids,
        }
    }
}
