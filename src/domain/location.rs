use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::crud::{CrudModel, SqliteQuery};

/// A Location, owning side of the one-to-one with Country.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Option<i64>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country_id: Option<i64>,
}

super::identity_eq!(Location);

impl CrudModel for Location {
    const TABLE: &'static str = "location";
    const ENTITY_NAME: &'static str = "location";
    const RESOURCE: &'static str = "locations";
    const COLUMNS: &'static [&'static str] = &[
        "street_address",
        "postal_code",
        "city",
        "state_province",
        "country_id",
    ];
    const SORT_COLUMNS: &'static [&'static str] = &[
        "id",
        "street_address",
        "postal_code",
        "city",
        "state_province",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.street_address.clone())
            .bind(self.postal_code.clone())
            .bind(self.city.clone())
            .bind(self.state_province.clone())
            .bind(self.country_id)
    }
}
