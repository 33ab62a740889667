use async_trait::async_trait;
use branch_desk_db::models::audit::AuditEntryModel;
use branch_desk_db::repository::find_by_id::FindById;
use branch_desk_db::repository::load_audits::LoadAudits;
use branch_desk_db::repository::pagination::{Page, PageRequest};
use sqlx::Row;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::AuditEntryRepositoryImpl;
use crate::utils::{to_i64, to_usize, TryFromRow};

impl AuditEntryRepositoryImpl {
    pub(super) async fn load_audits_impl(
        repo: &AuditEntryRepositoryImpl,
        application_id: i64,
        page: PageRequest,
    ) -> Result<Page<AuditEntryModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let total: i64 = sqlx::query("SELECT COUNT(*) AS count FROM audit_entry WHERE application_id = $1")
            .bind(application_id)
            .fetch_one(&mut **transaction)
            .await?
            .try_get("count")?;

        let rows = sqlx::query(
            r#"
            SELECT id, application_id, updated_fields, previous_values, new_values, changed_at, updated_by
            FROM audit_entry
            WHERE application_id = $1
            ORDER BY changed_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(application_id)
        .bind(to_i64(page.limit)?)
        .bind(to_i64(page.offset)?)
        .fetch_all(&mut **transaction)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(AuditEntryModel::try_from_row(&row)?);
        }
        Ok(Page::new(items, to_usize(total)?, page.limit, page.offset))
    }

    pub(super) async fn find_by_id_impl(
        repo: &AuditEntryRepositoryImpl,
        id: Uuid,
    ) -> Result<Option<AuditEntryModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let row = sqlx::query(
            r#"
            SELECT id, application_id, updated_fields, previous_values, new_values, changed_at, updated_by
            FROM audit_entry
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await?;

        row.map(|r| AuditEntryModel::try_from_row(&r)).transpose()
    }
}

#[async_trait]
impl LoadAudits for AuditEntryRepositoryImpl {
    async fn load_audits(
        &self,
        application_id: i64,
        page: PageRequest,
    ) -> Result<Page<AuditEntryModel>, Box<dyn Error + Send + Sync>> {
        Self::load_audits_impl(self, application_id, page).await
    }
}

#[async_trait]
impl FindById<AuditEntryModel> for AuditEntryRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditEntryModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_id_impl(self, id).await
    }
}
