use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::crud::{CrudModel, SqliteQuery};

/// A Task. Inverse side of the many-to-many with Job; the job set is not
/// serialized, mirroring how the owning side alone drives the join table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(skip)]
    pub job_ids: BTreeSet<i64>,
}

// The job set has no backing column; rows come out of storage with it empty.
impl<'r> FromRow<'r, SqliteRow> for Task {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            job_ids: BTreeSet::new(),
        })
    }
}

super::identity_eq!(Task);

impl CrudModel for Task {
    const TABLE: &'static str = "task";
    const ENTITY_NAME: &'static str = "task";
    const RESOURCE: &'static str = "tasks";
    const COLUMNS: &'static [&'static str] = &["title", "description"];
    const SORT_COLUMNS: &'static [&'static str] = &["id", "title"];
    const MEMBER_COLLECTIONS: &'static [&'static str] = &["job.tasks"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.title.clone())
            .bind(self.description.clone())
    }
}
