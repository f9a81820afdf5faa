//! Thin transactional façades over the generic CRUD operations.
//!
//! Mutating operations run inside a read-write transaction scoped to the
//! single call; reads go straight to the pool (each statement is its own
//! read-only unit). There is no business logic here beyond delegation, the
//! transaction boundary, and the second-level cache discipline: consult on
//! by-id reads, invalidate on every write.

pub mod job;

pub use job::JobService;

use crate::crud::CrudModel;
use crate::database::DatabaseError;
use crate::pagination::{Page, PageParams};
use crate::AppState;

pub struct CrudService;

impl CrudService {
    /// Insert when the id is absent, otherwise write under the supplied id
    /// (insert-or-update by primary key).
    pub async fn save<T: CrudModel>(state: &AppState, mut entity: T) -> Result<T, DatabaseError> {
        let mut tx = state.pool.begin().await?;
        let id = match entity.id() {
            None => {
                let id = entity.insert(&mut tx).await?;
                entity.set_id(id);
                id
            }
            Some(id) => {
                entity.upsert(&mut tx, id).await?;
                id
            }
        };
        entity.after_save(&mut tx).await?;
        tx.commit().await?;

        state.cache.invalidate(T::ENTITY_NAME, id);
        for region in T::MEMBER_COLLECTIONS {
            state.cache.clear(region);
        }
        Ok(entity)
    }

    pub async fn find_one<T: CrudModel>(
        state: &AppState,
        id: i64,
    ) -> Result<Option<T>, DatabaseError> {
        if let Some(cached) = state.cache.get(T::ENTITY_NAME, id) {
            if let Ok(entity) = serde_json::from_value::<T>(cached) {
                return Ok(Some(entity));
            }
        }

        let found = T::find_by_id(&state.pool, id).await?;
        if let Some(entity) = &found {
            if let Ok(value) = serde_json::to_value(entity) {
                state.cache.put(T::ENTITY_NAME, id, value);
            }
        }
        Ok(found)
    }

    pub async fn find_all<T: CrudModel>(
        state: &AppState,
        params: &PageParams,
    ) -> Result<Vec<T>, DatabaseError> {
        Ok(T::find_all(&state.pool, params).await?)
    }

    pub async fn find_page<T: CrudModel>(
        state: &AppState,
        params: &PageParams,
    ) -> Result<Page<T>, DatabaseError> {
        Ok(T::find_page(&state.pool, params).await?)
    }

    /// Delete by id. No existence pre-check: deleting an absent row succeeds.
    pub async fn delete<T: CrudModel>(state: &AppState, id: i64) -> Result<(), DatabaseError> {
        let mut tx = state.pool.begin().await?;
        T::before_delete(&mut tx, id).await?;
        T::delete_by_id(&mut tx, id).await?;
        tx.commit().await?;

        state.cache.invalidate(T::ENTITY_NAME, id);
        for region in T::MEMBER_COLLECTIONS {
            state.cache.clear(region);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database;
    use crate::domain::Region;

    async fn state() -> AppState {
        let pool = database::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        database::migrate(&pool).await.unwrap();
        AppState::new(pool)
    }

    fn region(name: &str) -> Region {
        Region {
            id: None,
            region_name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn save_assigns_identity_and_find_one_round_trips() {
        let state = state().await;
        let saved = CrudService::save(&state, region("Europe")).await.unwrap();
        let id = saved.id.unwrap();

        let found: Region = CrudService::find_one(&state, id).await.unwrap().unwrap();
        assert_eq!(found.region_name.as_deref(), Some("Europe"));
    }

    #[tokio::test]
    async fn find_one_populates_the_cache() {
        let state = state().await;
        let saved = CrudService::save(&state, region("Asia")).await.unwrap();
        let id = saved.id.unwrap();
        // save invalidates, so the first read is a miss that warms the region
        assert!(state.cache.get("region", id).is_none());

        let _: Option<Region> = CrudService::find_one(&state, id).await.unwrap();
        assert!(state.cache.get("region", id).is_some());
    }

    #[tokio::test]
    async fn delete_invalidates_the_cache() {
        let state = state().await;
        let saved = CrudService::save(&state, region("Africa")).await.unwrap();
        let id = saved.id.unwrap();
        let _: Option<Region> = CrudService::find_one(&state, id).await.unwrap();

        CrudService::delete::<Region>(&state, id).await.unwrap();

        assert!(state.cache.get("region", id).is_none());
        let gone: Option<Region> = CrudService::find_one(&state, id).await.unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test]
    async fn delete_of_absent_id_succeeds() {
        let state = state().await;
        CrudService::delete::<Region>(&state, 404).await.unwrap();
    }
}
