use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::crud::{CrudModel, SqliteQuery};

/// A Region. Inverse side of the Country one-to-one; the country row holds
/// the foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: Option<i64>,
    pub region_name: Option<String>,
}

super::identity_eq!(Region);

impl CrudModel for Region {
    const TABLE: &'static str = "region";
    const ENTITY_NAME: &'static str = "region";
    const RESOURCE: &'static str = "regions";
    const COLUMNS: &'static [&'static str] = &["region_name"];
    const SORT_COLUMNS: &'static [&'static str] = &["id", "region_name"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.region_name.clone())
    }
}
