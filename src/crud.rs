//! Generic identity-keyed CRUD over sqlx.
//!
//! One trait parameterized by entity type replaces a per-entity repository:
//! a model contributes its table metadata, column binds, id accessors and
//! validation, and inherits the storage operations.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqliteConnection, SqlitePool};

use crate::error::ApiError;
use crate::pagination::{Page, PageParams};

pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

#[async_trait]
pub trait CrudModel:
    Sized
    + Send
    + Sync
    + Unpin
    + Serialize
    + DeserializeOwned
    + for<'r> FromRow<'r, SqliteRow>
    + 'static
{
    /// Storage table name.
    const TABLE: &'static str;
    /// Entity name carried in error payloads and cache region keys.
    const ENTITY_NAME: &'static str;
    /// Plural path segment under /api.
    const RESOURCE: &'static str;
    /// Non-id columns, in the order `bind_columns` binds them.
    const COLUMNS: &'static [&'static str];
    /// Columns accepted in a ?sort= parameter.
    const SORT_COLUMNS: &'static [&'static str];
    /// Whether the list endpoint is paginated.
    const PAGINATED: bool = false;
    /// Collection cache regions that may hold rows of this entity. Cleared
    /// wholesale on every write, since the reverse mapping (which parents
    /// cached this row) is unknown without a query.
    const MEMBER_COLLECTIONS: &'static [&'static str] = &[];

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Field-level validation, applied at the boundary before any storage
    /// call.
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    /// Bind the values of `COLUMNS` onto a query, in declaration order.
    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;

    async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", Self::TABLE);
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn find_all(pool: &SqlitePool, params: &PageParams) -> Result<Vec<Self>, sqlx::Error> {
        let (column, direction) = params.sort_for(Self::SORT_COLUMNS);
        let sql = format!(
            "SELECT * FROM {} ORDER BY {} {}",
            Self::TABLE,
            column,
            direction
        );
        sqlx::query_as::<_, Self>(&sql).fetch_all(pool).await
    }

    async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {}", Self::TABLE);
        sqlx::query_scalar(&sql).fetch_one(pool).await
    }

    async fn find_page(pool: &SqlitePool, params: &PageParams) -> Result<Page<Self>, sqlx::Error> {
        let total_count = Self::count(pool).await?;
        let (column, direction) = params.sort_for(Self::SORT_COLUMNS);
        let sql = format!(
            "SELECT * FROM {} ORDER BY {} {} LIMIT ? OFFSET ?",
            Self::TABLE,
            column,
            direction
        );
        let content = sqlx::query_as::<_, Self>(&sql)
            .bind(params.size())
            .bind(params.page() * params.size())
            .fetch_all(pool)
            .await?;
        Ok(Page {
            content,
            total_count,
            page: params.page(),
            size: params.size(),
        })
    }

    /// Insert a new row; the store assigns the id.
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let placeholders = vec!["?"; Self::COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            Self::TABLE,
            Self::COLUMNS.join(", "),
            placeholders
        );
        let result = self
            .bind_columns(sqlx::query(&sql))
            .execute(&mut *conn)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Write a row under a caller-supplied id, inserting it when absent.
    /// This mirrors save-by-primary-key semantics: an update against an id
    /// that does not exist creates the row rather than failing.
    async fn upsert(&self, conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        let placeholders = vec!["?"; Self::COLUMNS.len()].join(", ");
        let assignments = Self::COLUMNS
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} (id, {}) VALUES (?, {}) ON CONFLICT(id) DO UPDATE SET {}",
            Self::TABLE,
            Self::COLUMNS.join(", "),
            placeholders,
            assignments
        );
        self.bind_columns(sqlx::query(&sql).bind(id))
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Delete by id without checking prior existence; deleting nothing is
    /// accepted silently.
    async fn delete_by_id(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = ?", Self::TABLE);
        sqlx::query(&sql).bind(id).execute(conn).await?;
        Ok(())
    }

    /// Hook run inside the save transaction after the row is written, with
    /// the id set. Used for owned association maintenance (join tables).
    async fn after_save(&self, _conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        Ok(())
    }

    /// Hook run inside the delete transaction before the row is removed.
    async fn before_delete(_conn: &mut SqliteConnection, _id: i64) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
