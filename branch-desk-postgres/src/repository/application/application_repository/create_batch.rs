use async_trait::async_trait;
use branch_desk_db::models::application::ApplicationModel;
use branch_desk_db::repository::create_batch::CreateBatch;
use sqlx::Row;
use std::error::Error;

use super::notes::replace_notes;
use super::repo_impl::ApplicationRepositoryImpl;

impl ApplicationRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &ApplicationRepositoryImpl,
        items: Vec<ApplicationModel>,
    ) -> Result<Vec<ApplicationModel>, Box<dyn Error + Send + Sync>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            let row = sqlx::query(
                r#"
                INSERT INTO application
                    (client_name, phone_number, product, status, branch_id,
                     is_deleted, deleted_at, deleted_by, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING id
                "#,
            )
            .bind(&item.client_name)
            .bind(item.phone_number.as_str())
            .bind(&item.product)
            .bind(item.status)
            .bind(item.branch_id)
            .bind(item.is_deleted)
            .bind(item.deleted_at)
            .bind(item.deleted_by.as_deref())
            .bind(item.created_at)
            .fetch_one(&mut **transaction)
            .await?;

            item.id = row.try_get("id")?;
            replace_notes(&mut **transaction, &item).await?;
            saved_items.push(item);
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<ApplicationModel> for ApplicationRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<ApplicationModel>,
    ) -> Result<Vec<ApplicationModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use branch_desk_db::repository::create_batch::CreateBatch;
    use branch_desk_db::repository::find_by_id::FindById;
    use chrono::Utc;

    use super::super::test_utils::test_utils::{create_test_application, create_test_branch};

    #[tokio::test]
    #[ignore]
    async fn test_create_batch_assigns_ids_and_keeps_notes() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let branch = create_test_branch(&ctx).await?;
        let repo = &ctx.application_repos().application_repository;

        let mut application = create_test_application("Ivan Ivanov", branch.id);
        application.notes.append("called back", "admin", Utc::now());
        application.notes.append("documents received", "admin", Utc::now());

        let saved = repo.create_batch(vec![application.clone()]).await?;
        assert_eq!(saved.len(), 1);
        assert!(saved[0].id > 0);

        let loaded = repo.find_by_id(saved[0].id).await?.expect("application stored");
        assert_eq!(loaded.client_name, "Ivan Ivanov");
        assert_eq!(loaded.notes.ids(), application.notes.ids());

        Ok(())
    }
}
