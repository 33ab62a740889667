use async_trait::async_trait;
use branch_desk_db::models::application::ApplicationModel;
use branch_desk_db::repository::update_batch::UpdateBatch;
use std::error::Error;

use super::notes::replace_notes;
use super::repo_impl::ApplicationRepositoryImpl;

impl ApplicationRepositoryImpl {
    pub(super) async fn update_batch_impl(
        repo: &ApplicationRepositoryImpl,
        items: Vec<ApplicationModel>,
    ) -> Result<Vec<ApplicationModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            let result = sqlx::query(
                r#"
                UPDATE application SET
                    client_name = $2,
                    phone_number = $3,
                    product = $4,
                    status = $5,
                    branch_id = $6,
                    is_deleted = $7,
                    deleted_at = $8,
                    deleted_by = $9
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(&item.client_name)
            .bind(item.phone_number.as_str())
            .bind(&item.product)
            .bind(item.status)
            .bind(item.branch_id)
            .bind(item.is_deleted)
            .bind(item.deleted_at)
            .bind(item.deleted_by.as_deref())
            .execute(&mut **transaction)
            .await?;

            if result.rows_affected() == 0 {
                return Err(format!("Application with ID {} not found", item.id).into());
            }

            replace_notes(&mut **transaction, item).await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl UpdateBatch<ApplicationModel> for ApplicationRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<ApplicationModel>,
    ) -> Result<Vec<ApplicationModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items).await
    }
}
