use async_trait::async_trait;
use branch_desk_db::models::audit::AuditEntryModel;
use branch_desk_db::repository::create_batch::CreateBatch;
use sqlx::types::Json;
use std::error::Error;

use super::repo_impl::AuditEntryRepositoryImpl;

impl AuditEntryRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &AuditEntryRepositoryImpl,
        items: Vec<AuditEntryModel>,
    ) -> Result<Vec<AuditEntryModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO audit_entry
                    (id, application_id, updated_fields, previous_values, new_values, changed_at, updated_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.id)
            .bind(item.application_id)
            .bind(&item.updated_fields)
            .bind(Json(&item.previous_values))
            .bind(Json(&item.new_values))
            .bind(item.changed_at)
            .bind(&item.updated_by)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(items)
    }
}

#[async_trait]
impl CreateBatch<AuditEntryModel> for AuditEntryRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<AuditEntryModel>,
    ) -> Result<Vec<AuditEntryModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items).await
    }
}
