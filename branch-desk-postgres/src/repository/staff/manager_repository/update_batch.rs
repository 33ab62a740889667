use async_trait::async_trait;
use branch_desk_db::models::staff::ManagerModel;
use branch_desk_db::repository::delete_batch::DeleteBatch;
use branch_desk_db::repository::update_batch::UpdateBatch;
use std::error::Error;

use super::repo_impl::ManagerRepositoryImpl;

impl ManagerRepositoryImpl {
    pub(super) async fn update_batch_impl(
        repo: &ManagerRepositoryImpl,
        items: Vec<ManagerModel>,
    ) -> Result<Vec<ManagerModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            let result = sqlx::query(
                r#"
                UPDATE manager SET name = $2, password = $3, branch_id = $4
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(&item.password)
            .bind(item.branch_id)
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                return Err(format!("Manager with ID {} not found", item.id).into());
            }
        }

        Ok(items)
    }

    pub(super) async fn delete_batch_impl(
        repo: &ManagerRepositoryImpl,
        ids: &[i64],
    ) -> Result<usize, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let result = sqlx::query("DELETE FROM manager WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut **transaction)
            .await?;

        Ok(usize::try_from(result.rows_affected())?)
    }
}

#[async_trait]
impl UpdateBatch<ManagerModel> for ManagerRepositoryImpl {
    async fn update_batch(&self, items: Vec<ManagerModel>) -> Result<Vec<ManagerModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items).await
    }
}

#[async_trait]
impl DeleteBatch<ManagerModel> for ManagerRepositoryImpl {
    async fn delete_batch(&self, ids: &[i64]) -> Result<usize, Box<dyn Error + Send + Sync>> {
        Self::delete_batch_impl(self, ids).await
    }
}
