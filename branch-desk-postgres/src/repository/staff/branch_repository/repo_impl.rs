use async_trait::async_trait;
use branch_desk_db::models::staff::BranchModel;
use branch_desk_db::repository::branch_repository::BranchRepository;
use branch_desk_db::repository::create_batch::CreateBatch;
use branch_desk_db::repository::exist_by_ids::ExistByIds;
use branch_desk_db::repository::find_by_id::FindById;
use sqlx::{postgres::PgRow, Row};
use std::collections::HashSet;
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, map_unique_violation, TryFromRow};

pub struct BranchRepositoryImpl {
    pub(crate) executor: Executor,
}

impl BranchRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for BranchModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(BranchModel {
            id: row.try_get("id")?,
            name: get_heapless_string(row, "name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl CreateBatch<BranchModel> for BranchRepositoryImpl {
    async fn create_batch(&self, items: Vec<BranchModel>) -> Result<Vec<BranchModel>, Box<dyn Error + Send + Sync>> {
        let mut saved_items = Vec::with_capacity(items.len());
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        for mut item in items {
            let row = sqlx::query("INSERT INTO branch (name, created_at) VALUES ($1, $2) RETURNING id")
                .bind(item.name.as_str())
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
impl FindById<BranchModel> for BranchRepositoryImpl {
    async fn find_by_id(&self, id: i64) -> Result<Option<BranchModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let row = sqlx::query("SELECT id, name, created_at FROM branch WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **transaction)
            .await?;
        row.map(|r| BranchModel::try_from_row(&r)).transpose()
    }
}

#[async_trait]
impl ExistByIds<BranchModel> for BranchRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[i64]) -> Result<Vec<(i64, bool)>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let rows = sqlx::query("SELECT id FROM branch WHERE id = ANY($1)")
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
impl BranchRepository for BranchRepositoryImpl {
    async fn find_by_name(&self, name: &str) -> Result<Option<BranchModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let row = sqlx::query("SELECT id, name, created_at FROM branch WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut **transaction)
            .await?;
        row.map(|r| BranchModel::try_from_row(&r)).transpose()
    }

    async fn find_all(&self) -> Result<Vec<BranchModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
        let rows = sqlx::query("SELECT id, name, created_at FROM branch ORDER BY id")
            .fetch_all(&mut **transaction)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(BranchModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::application::application_repository::test_utils::test_utils::create_test_branch;
    use crate::test_helper::setup_test_context;
    use branch_desk_db::models::staff::BranchModel;
    use branch_desk_db::repository::branch_repository::BranchRepository;
    use branch_desk_db::repository::create_batch::CreateBatch;
    use branch_desk_db::repository::exist_by_ids::ExistByIds;
    use branch_desk_db::repository::UniqueViolation;

    #[tokio::test]
    #[ignore]
    async fn test_branch_lookups() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let branch = create_test_branch(&ctx).await?;
        let repo = &ctx.staff_repos().branch_repository;

        let by_name = repo.find_by_name(&branch.name).await?.expect("branch stored");
        assert_eq!(by_name.id, branch.id);
        assert!(repo.find_all().await?.iter().any(|b| b.id == branch.id));
        assert_eq!(
            repo.exist_by_ids(&[branch.id, -1]).await?,
            vec![(branch.id, true), (-1, false)]
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore]
    async fn test_duplicate_name_is_a_unique_violation() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let branch = create_test_branch(&ctx).await?;
        let repo = &ctx.staff_repos().branch_repository;

        let duplicate = BranchModel {
            id: 0,
            name: branch.name.clone(),
            created_at: chrono::Utc::now(),
        };
        let err = repo.create_batch(vec![duplicate]).await.unwrap_err();
        assert!(UniqueViolation::is(&*err));

        Ok(())
    }
}
