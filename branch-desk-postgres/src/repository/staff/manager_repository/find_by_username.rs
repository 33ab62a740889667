use async_trait::async_trait;
use branch_desk_db::models::staff::ManagerModel;
use branch_desk_db::repository::exist_by_ids::ExistByIds;
use branch_desk_db::repository::find_by_id::FindById;
use branch_desk_db::repository::manager_repository::ManagerRepository;
use branch_desk_db::repository::pagination::{Page, PageRequest};
use sqlx::Row;
use std::collections::HashSet;
use std::error::Error;

use super::repo_impl::{ManagerRepositoryImpl, MANAGER_COLUMNS};
use crate::utils::{to_i64, to_usize, TryFromRow};

impl ManagerRepositoryImpl {
    pub(super) async fn find_by_id_impl(
        repo: &ManagerRepositoryImpl,
        id: i64,
    ) -> Result<Option<ManagerModel>, Box<dyn Error + Send + Sync>> {
        let query = format!("SELECT {MANAGER_COLUMNS} FROM manager WHERE id = $1");
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let row = sqlx::query(&query).bind(id).fetch_optional(&mut **transaction).await?;
        row.map(|r| ManagerModel::try_from_row(&r)).transpose()
    }

    pub(super) async fn find_by_username_impl(
        repo: &ManagerRepositoryImpl,
        username: &str,
    ) -> Result<Option<ManagerModel>, Box<dyn Error + Send + Sync>> {
        let query = format!("SELECT {MANAGER_COLUMNS} FROM manager WHERE username = $1");
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let row = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&mut **transaction)
            .await?;
        row.map(|r| ManagerModel::try_from_row(&r)).transpose()
    }

    pub(super) async fn find_page_impl(
        repo: &ManagerRepositoryImpl,
        page: PageRequest,
    ) -> Result<Page<ManagerModel>, Box<dyn Error + Send + Sync>> {
        let query = format!("SELECT {MANAGER_COLUMNS} FROM manager ORDER BY id LIMIT $1 OFFSET $2");
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query("SELECT COUNT(*) AS count FROM manager")
            .fetch_one(&mut **transaction)
            .await?
            .try_get("count")?;
        let rows = sqlx::query(&query)
            .bind(to_i64(page.limit)?)
            .bind(to_i64(page.offset)?)
            .fetch_all(&mut **transaction)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(ManagerModel::try_from_row(&row)?);
        }
        Ok(Page::new(items, to_usize(total)?, page.limit, page.offset))
    }

    pub(super) async fn exist_by_ids_impl(
        repo: &ManagerRepositoryImpl,
        ids: &[i64],
    ) -> Result<Vec<(i64, bool)>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let rows = sqlx::query("SELECT id FROM manager WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&mut **transaction)
            .await?;

        let mut found = HashSet::with_capacity(rows.len());
        for row in rows {
            found.insert(row.try_get::<i64, _>("id")?);
        }
        Ok(ids.iter().map(|id| (*id, found.contains(id))).collect())
    }
}

#[async_trait]
impl FindById<ManagerModel> for ManagerRepositoryImpl {
    async fn find_by_id(&self, id: i64) -> Result<Option<ManagerModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_id_impl(self, id).await
    }
}

#[async_trait]
impl ExistByIds<ManagerModel> for ManagerRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[i64]) -> Result<Vec<(i64, bool)>, Box<dyn Error + Send + Sync>> {
        Self::exist_by_ids_impl(self, ids).await
    }
}

#[async_trait]
impl ManagerRepository for ManagerRepositoryImpl {
    async fn find_by_username(&self, username: &str) -> Result<Option<ManagerModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_username_impl(self, username).await
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<ManagerModel>, Box<dyn Error + Send + Sync>> {
        Self::find_page_impl(self, page).await
    }
}
