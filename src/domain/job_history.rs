use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::crud::{CrudModel, SqliteQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Language {
    English,
    French,
    Spanish,
}

/// A JobHistory row: a point-in-time snapshot linking a job, a department and
/// an employee. Each reference is a unique foreign key, and rows are written
/// once and kept as historical record; no update path is special-cased.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobHistory {
    pub id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub language: Option<Language>,
    pub job_id: Option<i64>,
    pub department_id: Option<i64>,
    pub employee_id: Option<i64>,
}

super::identity_eq!(JobHistory);

impl CrudModel for JobHistory {
    const TABLE: &'static str = "job_history";
    const ENTITY_NAME: &'static str = "jobHistory";
    const RESOURCE: &'static str = "job-histories";
    const COLUMNS: &'static [&'static str] = &[
        "start_date",
        "end_date",
        "language",
        "job_id",
        "department_id",
        "employee_id",
    ];
    const SORT_COLUMNS: &'static [&'static str] = &["id", "start_date", "end_date", "language"];
    const PAGINATED: bool = true;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.language)
            .bind(self.job_id)
            .bind(self.department_id)
            .bind(self.employee_id)
    }
}
