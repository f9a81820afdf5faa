use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::crud::{CrudModel, SqliteQuery};

/// A Country. Owning side of the one-to-one with Region: `region_id` is a
/// unique foreign key, so no two countries may point at the same region.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: Option<i64>,
    pub country_name: Option<String>,
    pub region_id: Option<i64>,
}

super::identity_eq!(Country);

impl CrudModel for Country {
    const TABLE: &'static str = "country";
    const ENTITY_NAME: &'static str = "country";
    const RESOURCE: &'static str = "countries";
    const COLUMNS: &'static [&'static str] = &["country_name", "region_id"];
    const SORT_COLUMNS: &'static [&'static str] = &["id", "country_name", "region_id"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.country_name.clone()).bind(self.region_id)
    }
}
