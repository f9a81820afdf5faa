use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An account in the generated identity subsystem. Consumed by the
/// authentication endpoint; not part of the entity CRUD surface.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub activated: bool,
}

/// A role name, e.g. ROLE_ADMIN. Many-to-many with User via `user_authority`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Authority {
    pub name: String,
}
