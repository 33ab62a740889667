use async_trait::async_trait;
use branch_desk_db::models::staff::ManagerModel;
use branch_desk_db::repository::create_batch::CreateBatch;
use sqlx::Row;
use std::error::Error;

use super::repo_impl::ManagerRepositoryImpl;
use crate::utils::map_unique_violation;

impl ManagerRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &ManagerRepositoryImpl,
        items: Vec<ManagerModel>,
    ) -> Result<Vec<ManagerModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            let row = sqlx::query(
                r#"
                INSERT INTO manager (username, name, password, branch_id, created_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(item.username.as_str())
            .bind(item.name.as_str())
            .bind(&item.password)
            .bind(item.branch_id)
            .bind(item.created_at)
            .fetch_one(&mut **transaction)
            .await
            .map_err(map_unique_violation)?;

            item.id = row.try_get("id")?;
            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<ManagerModel> for ManagerRepositoryImpl {
    async fn create_batch(&self, items: Vec<ManagerModel>) -> Result<Vec<ManagerModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items).await
    }
}
