use async_trait::async_trait;
use branch_desk_api::ApplicationStatus;
use branch_desk_db::models::application::{ApplicationCriteria, ApplicationModel, BranchCount, StatusCounts};
use branch_desk_db::repository::application_repository::ApplicationRepository;
use branch_desk_db::repository::pagination::{Page, PageRequest};
use sqlx::Row;
use std::error::Error;

use super::notes::attach_notes;
use super::repo_impl::ApplicationRepositoryImpl;
use crate::repository::application::query_builder;
use crate::utils::{to_usize, TryFromRow};

impl ApplicationRepositoryImpl {
    pub(super) async fn find_page_impl(
        repo: &ApplicationRepositoryImpl,
        criteria: &ApplicationCriteria,
        page: PageRequest,
    ) -> Result<Page<ApplicationModel>, Box<dyn Error + Send + Sync>> {
        let mut select = query_builder::select_page(criteria, page)?;
        let mut count = query_builder::count_all(criteria);

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = count.build().fetch_one(&mut **transaction).await?.try_get("count")?;
        let rows = select.build().fetch_all(&mut **transaction).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(ApplicationModel::try_from_row(&row)?);
        }
        attach_notes(&mut **transaction, &mut items).await?;

        Ok(Page::new(items, to_usize(total)?, page.limit, page.offset))
    }

    pub(super) async fn count_by_status_impl(
        repo: &ApplicationRepositoryImpl,
        criteria: &ApplicationCriteria,
    ) -> Result<StatusCounts, Box<dyn Error + Send + Sync>> {
        let mut query = query_builder::count_by_status(criteria);
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            query.build().fetch_all(&mut **transaction).await?
        };

        let mut counts = StatusCounts::default();
        for row in rows {
            let status: ApplicationStatus = row.try_get("status")?;
            counts.record(status, row.try_get("count")?);
        }
        Ok(counts)
    }

    pub(super) async fn count_by_branch_impl(
        repo: &ApplicationRepositoryImpl,
        criteria: &ApplicationCriteria,
    ) -> Result<Vec<BranchCount>, Box<dyn Error + Send + Sync>> {
        let mut query = query_builder::count_by_branch(criteria);
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            query.build().fetch_all(&mut **transaction).await?
        };

        let mut counts = Vec::with_capacity(rows.len());
        for row in rows {
            counts.push(BranchCount {
                branch_id: row.try_get("branch_id")?,
                count: row.try_get("count")?,
            });
        }
        Ok(counts)
    }
}

#[async_trait]
impl ApplicationRepository for ApplicationRepositoryImpl {
    async fn find_page(
        &self,
        criteria: &ApplicationCriteria,
        page: PageRequest,
    ) -> Result<Page<ApplicationModel>, Box<dyn Error + Send + Sync>> {
        Self::find_page_impl(self, criteria, page).await
    }

    async fn count_by_status(&self, criteria: &ApplicationCriteria) -> Result<StatusCounts, Box<dyn Error + Send + Sync>> {
        Self::count_by_status_impl(self, criteria).await
    }

    async fn count_by_branch(
        &self,
        criteria: &ApplicationCriteria,
    ) -> Result<Vec<BranchCount>, Box<dyn Error + Send + Sync>> {
        Self::count_by_branch_impl(self, criteria).await
    }
}
