use async_trait::async_trait;
use branch_desk_db::models::staff::AdminModel;
use branch_desk_db::repository::admin_repository::AdminRepository;
use branch_desk_db::repository::create_batch::CreateBatch;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::TryFromRow;

pub struct AdminRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AdminRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for AdminModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(AdminModel {
            id: row.try_get("id")?,
            password: row.try_get("password")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl CreateBatch<AdminModel> for AdminRepositoryImpl {
    async fn create_batch(&self, items: Vec<AdminModel>) -> Result<Vec<AdminModel>, Box<dyn Error + Send + Sync>> {
        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            let row = sqlx::query("INSERT INTO admin (password, created_at) VALUES ($1, $2) RETURNING id")
                .bind(&item.password)
                .bind(item.created_at)
                .fetch_one(&mut **transaction)
                .await?;
            item.id = row.try_get("id")?;
            saved_items.push(item);
        }
        Ok(saved_items)
    }
}

#[async_trait]
impl AdminRepository for AdminRepositoryImpl {
    async fn find_first(&self) -> Result<Option<AdminModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let row = sqlx::query("SELECT id, password, created_at FROM admin ORDER BY id LIMIT 1")
            .fetch_optional(&mut **transaction)
            .await?;
        row.map(|r| AdminModel::try_from_row(&r)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_context;
    use branch_desk_db::models::staff::AdminModel;
    use branch_desk_db::repository::admin_repository::AdminRepository;
    use branch_desk_db::repository::create_batch::CreateBatch;
    use chrono::Utc;

    #[tokio::test]
    #[ignore]
    async fn test_find_first_returns_lowest_id() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = &ctx.staff_repos().admin_repository;

        let admins = vec![
            AdminModel { id: 0, password: "aa".to_string(), created_at: Utc::now() },
            AdminModel { id: 0, password: "bb".to_string(), created_at: Utc::now() },
        ];
        let saved = repo.create_batch(admins).await?;
        let first = repo.find_first().await?.expect("an admin exists");
        assert!(first.id <= saved[0].id);

        Ok(())
    }
}
