use branch_desk_api::FieldValues;
use branch_desk_db::models::audit::AuditEntryModel;
use sqlx::{postgres::PgRow, types::Json, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::TryFromRow;

pub struct AuditEntryRepositoryImpl {
    pub(crate) executor: Executor,
}

impl AuditEntryRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for AuditEntryModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let previous_values: Json<FieldValues> = row.try_get("previous_values")?;
        let new_values: Json<FieldValues> = row.try_get("new_values")?;
        Ok(AuditEntryModel {
            id: row.try_get("id")?,
            application_id: row.try_get("application_id")?,
            updated_fields: row.try_get("updated_fields")?,
            previous_values: previous_values.0,
            new_values: new_values.0,
            changed_at: row.try_get("changed_at")?,
            updated_by: row.try_get("updated_by")?,
        })
    }
}
