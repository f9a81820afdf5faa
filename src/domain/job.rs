use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection};

use crate::crud::{CrudModel, SqliteQuery};

use super::Task;

/// A Job. Owning side of the many-to-many with Task through the `job_task`
/// join table.
///
/// `tasks` is `None` unless the caller asked for eager relationship
/// resolution; the default retrieval leaves the association unresolved and
/// the field is omitted from serialized output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Option<i64>,
    pub job_title: Option<String>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub employee_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

// The task list has no backing column; rows come out of storage unresolved.
impl<'r> FromRow<'r, SqliteRow> for Job {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            job_title: row.try_get("job_title")?,
            min_salary: row.try_get("min_salary")?,
            max_salary: row.try_get("max_salary")?,
            employee_id: row.try_get("employee_id")?,
            tasks: None,
        })
    }
}

super::identity_eq!(Job);

impl Job {
    /// Associate a task, inserting into both sides' collections. Adding an
    /// already-associated task is a no-op.
    pub fn add_task(&mut self, task: &mut Task) {
        let tasks = self.tasks.get_or_insert_with(Vec::new);
        match task.id {
            Some(task_id) if tasks.iter().any(|t| t.id == Some(task_id)) => {}
            _ => tasks.push(task.clone()),
        }
        if let Some(job_id) = self.id {
            task.job_ids.insert(job_id);
        }
    }

    /// Dissociate a task from both sides. Removing an absent task is a no-op.
    pub fn remove_task(&mut self, task: &mut Task) {
        if let Some(tasks) = &mut self.tasks {
            tasks.retain(|t| !(t.id.is_some() && t.id == task.id));
        }
        if let Some(job_id) = self.id {
            task.job_ids.remove(&job_id);
        }
    }
}

#[async_trait]
impl CrudModel for Job {
    const TABLE: &'static str = "job";
    const ENTITY_NAME: &'static str = "job";
    const RESOURCE: &'static str = "jobs";
    const COLUMNS: &'static [&'static str] =
        &["job_title", "min_salary", "max_salary", "employee_id"];
    const SORT_COLUMNS: &'static [&'static str] =
        &["id", "job_title", "min_salary", "max_salary"];
    const PAGINATED: bool = true;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.job_title.clone())
            .bind(self.min_salary)
            .bind(self.max_salary)
            .bind(self.employee_id)
    }

    /// Replace the join-table rows when the payload carried a task list.
    /// A payload without `tasks` leaves the association untouched.
    async fn after_save(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
        let (Some(job_id), Some(tasks)) = (self.id, &self.tasks) else {
            return Ok(());
        };

        sqlx::query("DELETE FROM job_task WHERE job_id = ?")
            .bind(job_id)
            .execute(&mut *conn)
            .await?;

        for task in tasks {
            if let Some(task_id) = task.id {
                sqlx::query("INSERT OR IGNORE INTO job_task (job_id, task_id) VALUES (?, ?)")
                    .bind(job_id)
                    .bind(task_id)
                    .execute(&mut *conn)
                    .await?;
            }
        }
        Ok(())
    }

    async fn before_delete(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM job_task WHERE job_id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
