use crate::crud::CrudModel;
use crate::database::DatabaseError;
use crate::domain::{Job, Task};
use crate::pagination::{Page, PageParams};
use crate::AppState;

use super::CrudService;

/// Region for the cached Job->Task collection lookups.
const TASKS_REGION: &str = "job.tasks";

/// Job-specific façade: everything the generic service does, plus the eager
/// variants that resolve the Job<->Task association in the same call.
pub struct JobService;

impl JobService {
    pub async fn find_page_eager(
        state: &AppState,
        params: &PageParams,
    ) -> Result<Page<Job>, DatabaseError> {
        let mut page = Job::find_page(&state.pool, params).await?;
        for job in &mut page.content {
            if let Some(id) = job.id {
                job.tasks = Some(Self::load_tasks(state, id).await?);
            }
        }
        Ok(page)
    }

    pub async fn find_one_eager(
        state: &AppState,
        id: i64,
    ) -> Result<Option<Job>, DatabaseError> {
        let Some(mut job) = CrudService::find_one::<Job>(state, id).await? else {
            return Ok(None);
        };
        job.tasks = Some(Self::load_tasks(state, id).await?);
        Ok(Some(job))
    }

    /// Resolve the task collection for one job, consulting the collection
    /// cache region first.
    async fn load_tasks(state: &AppState, job_id: i64) -> Result<Vec<Task>, DatabaseError> {
        if let Some(cached) = state.cache.get(TASKS_REGION, job_id) {
            if let Ok(tasks) = serde_json::from_value::<Vec<Task>>(cached) {
                return Ok(tasks);
            }
        }

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT t.* FROM task t
             JOIN job_task jt ON jt.task_id = t.id
             WHERE jt.job_id = ?
             ORDER BY t.id",
        )
        .bind(job_id)
        .fetch_all(&state.pool)
        .await?;

        if let Ok(value) = serde_json::to_value(&tasks) {
            state.cache.put(TASKS_REGION, job_id, value);
        }
        Ok(tasks)
    }
}
