use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::crud::{CrudModel, SqliteQuery};

use super::Job;

/// The Employee entity.
///
/// `manager_id` is a self-reference; `department_id` points at the owning
/// department. The job collection is an id set resolved through the
/// repository, never a set of live objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub hire_date: Option<DateTime<Utc>>,
    pub salary: Option<i64>,
    pub commission_pct: Option<i64>,
    pub manager_id: Option<i64>,
    pub department_id: Option<i64>,
    #[serde(skip)]
    pub job_ids: BTreeSet<i64>,
}

// The job set has no backing column; rows come out of storage with it empty.
impl<'r> FromRow<'r, SqliteRow> for Employee {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            hire_date: row.try_get("hire_date")?,
            salary: row.try_get("salary")?,
            commission_pct: row.try_get("commission_pct")?,
            manager_id: row.try_get("manager_id")?,
            department_id: row.try_get("department_id")?,
            job_ids: BTreeSet::new(),
        })
    }
}

super::identity_eq!(Employee);

impl Employee {
    /// Add a job, updating both sides. Already-present jobs are a no-op.
    pub fn add_job(&mut self, job: &mut Job) {
        if let Some(id) = job.id {
            self.job_ids.insert(id);
        }
        job.employee_id = self.id;
    }

    /// Remove a job and clear its back-reference. Absent jobs are a no-op.
    pub fn remove_job(&mut self, job: &mut Job) {
        if let Some(id) = job.id {
            self.job_ids.remove(&id);
        }
        job.employee_id = None;
    }
}

impl CrudModel for Employee {
    const TABLE: &'static str = "employee";
    const ENTITY_NAME: &'static str = "employee";
    const RESOURCE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "email",
        "phone_number",
        "hire_date",
        "salary",
        "commission_pct",
        "manager_id",
        "department_id",
    ];
    const SORT_COLUMNS: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "email",
        "hire_date",
        "salary",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.first_name.clone())
            .bind(self.last_name.clone())
            .bind(self.email.clone())
            .bind(self.phone_number.clone())
            .bind(self.hire_date)
            .bind(self.salary)
            .bind(self.commission_pct)
            .bind(self.manager_id)
            .bind(self.department_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_job_keeps_both_sides_consistent() {
        let mut emp = Employee {
            id: Some(5),
            ..Default::default()
        };
        let mut job = Job {
            id: Some(9),
            ..Default::default()
        };

        emp.add_job(&mut job);
        assert!(emp.job_ids.contains(&9));
        assert_eq!(job.employee_id, Some(5));

        emp.remove_job(&mut job);
        assert!(emp.job_ids.is_empty());
        assert_eq!(job.employee_id, None);
    }
}
