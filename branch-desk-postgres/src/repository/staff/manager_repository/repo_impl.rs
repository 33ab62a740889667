use branch_desk_db::models::staff::ManagerModel;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;

use postgres_unit_of_work::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub(crate) const MANAGER_COLUMNS: &str = "id, username, name, password, branch_id, created_at";

pub struct ManagerRepositoryImpl {
    pub(crate) executor: Executor,
}

impl ManagerRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ManagerModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ManagerModel {
            id: row.try_get("id")?,
            username: get_heapless_string(row, "username")?,
            name: get_heapless_string(row, "name")?,
            password: row.try_get("password")?,
            branch_id: row.try_get("branch_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
