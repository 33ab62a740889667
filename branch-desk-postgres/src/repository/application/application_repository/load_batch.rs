use async_trait::async_trait;
use branch_desk_db::models::application::ApplicationModel;
use branch_desk_db::repository::exist_by_ids::ExistByIds;
use branch_desk_db::repository::find_by_id::FindById;
use branch_desk_db::repository::load_batch::LoadBatch;
use sqlx::Row;
use std::collections::{HashMap, HashSet};
use std::error::Error;

use super::notes::attach_notes;
use super::repo_impl::ApplicationRepositoryImpl;
use crate::repository::application::query_builder::select_columns;
use crate::utils::TryFromRow;

impl ApplicationRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &ApplicationRepositoryImpl,
        ids: &[i64],
    ) -> Result<Vec<Option<ApplicationModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {} FROM application WHERE id = ANY($1)", select_columns());
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let rows = sqlx::query(&query).bind(ids).fetch_all(&mut **transaction).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(ApplicationModel::try_from_row(&row)?);
        }
        attach_notes(&mut **transaction, &mut items).await?;

        let mut item_map: HashMap<i64, ApplicationModel> = items.into_iter().map(|a| (a.id, a)).collect();
        Ok(ids.iter().map(|id| item_map.remove(id)).collect())
    }

    pub(super) async fn exist_by_ids_impl(
        repo: &ApplicationRepositoryImpl,
        ids: &[i64],
    ) -> Result<Vec<(i64, bool)>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query("SELECT id FROM application WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut found = HashSet::with_capacity(rows.len());
        for row in rows {
            found.insert(row.try_get::<i64, _>("id")?);
        }
        Ok(ids.iter().map(|id| (*id, found.contains(id))).collect())
    }
}

#[async_trait]
impl LoadBatch<ApplicationModel> for ApplicationRepositoryImpl {
    async fn load_batch(&self, ids: &[i64]) -> Result<Vec<Option<ApplicationModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids).await
    }
}

#[async_trait]
impl FindById<ApplicationModel> for ApplicationRepositoryImpl {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApplicationModel>, Box<dyn Error + Send + Sync>> {
        Ok(Self::load_batch_impl(self, &[id]).await?.into_iter().next().flatten())
    }
}

#[async_trait]
impl ExistByIds<ApplicationModel> for ApplicationRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[i64]) -> Result<Vec<(i64, bool)>, Box<dyn Error + Send + Sync>> {
        Self::exist_by_ids_impl(self, ids).await
    }
}
