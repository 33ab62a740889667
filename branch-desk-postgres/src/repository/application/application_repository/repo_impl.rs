use branch_desk_db::models::application::{ApplicationModel, NoteModel, NoteSequence};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct ApplicationRepositoryImpl {
    pub(crate) executor: Executor,
}

impl ApplicationRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

/// Notes are attached separately, see `notes.rs`
impl TryFromRow<PgRow> for ApplicationModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ApplicationModel {
            id: row.try_get("id")?,
            client_name: row.try_get("client_name")?,
            phone_number: get_heapless_string(row, "phone_number")?,
            product: row.try_get("product")?,
            status: row.try_get("status")?,
            branch_id: row.try_get("branch_id")?,
            notes: NoteSequence::new(),
            is_deleted: row.try_get("is_deleted")?,
            deleted_at: row.try_get("deleted_at")?,
            deleted_by: row.try_get("deleted_by")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TryFromRow<PgRow> for NoteModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(NoteModel {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
            created_by: row.try_get("created_by")?,
            is_updated: row.try_get("is_updated")?,
            updated_by: row.try_get("updated_by")?,
        })
    }
}
