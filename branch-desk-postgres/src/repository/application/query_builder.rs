use branch_desk_api::SortDirection;
use branch_desk_db::models::application::ApplicationCriteria;
use branch_desk_db::repository::pagination::PageRequest;
use sqlx::{Postgres, QueryBuilder};
use std::error::Error;

use crate::utils::to_i64;

const APPLICATION_COLUMNS: &str = "id, client_name, phone_number, product, status, branch_id, \
     is_deleted, deleted_at, deleted_by, created_at";

/// Appends the `WHERE` clause selecting every application matching `criteria`
pub fn push_where(builder: &mut QueryBuilder<'static, Postgres>, criteria: &ApplicationCriteria) {
    builder.push(" WHERE is_deleted = ").push_bind(criteria.deleted);
    if let Some(branch_id) = criteria.branch_id {
        builder.push(" AND branch_id = ").push_bind(branch_id);
    }
    if let Some(status) = criteria.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(pattern) = criteria.search_pattern() {
        builder
            .push(" AND (phone_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR client_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn push_order_by(builder: &mut QueryBuilder<'static, Postgres>, criteria: &ApplicationCriteria) {
    builder.push(" ORDER BY ");
    let mut separated = builder.separated(", ");
    for key in criteria.effective_sort() {
        let direction = match (key.direction, key.field.is_nullable()) {
            (SortDirection::Asc, false) => "ASC",
            (SortDirection::Desc, false) => "DESC",
            (SortDirection::Asc, true) => "ASC NULLS FIRST",
            (SortDirection::Desc, true) => "DESC NULLS LAST",
        };
        separated.push(format!("{} {}", key.field.column(), direction));
    }
}

/// One page of matching applications, without notes
pub fn select_page(
    criteria: &ApplicationCriteria,
    page: PageRequest,
) -> Result<QueryBuilder<'static, Postgres>, Box<dyn Error + Send + Sync>> {
    let mut builder = QueryBuilder::new(format!("SELECT {APPLICATION_COLUMNS} FROM application"));
    push_where(&mut builder, criteria);
    push_order_by(&mut builder, criteria);
    builder
        .push(" LIMIT ")
        .push_bind(to_i64(page.limit)?)
        .push(" OFFSET ")
        .push_bind(to_i64(page.offset)?);
    Ok(builder)
}

pub fn count_all(criteria: &ApplicationCriteria) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) AS count FROM application");
    push_where(&mut builder, criteria);
    builder
}

pub fn count_by_status(criteria: &ApplicationCriteria) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT status, COUNT(*) AS count FROM application");
    push_where(&mut builder, criteria);
    builder.push(" GROUP BY status");
    builder
}

pub fn count_by_branch(criteria: &ApplicationCriteria) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT branch_id, COUNT(*) AS count FROM application");
    push_where(&mut builder, criteria);
    builder.push(" GROUP BY branch_id ORDER BY branch_id");
    builder
}

pub fn select_columns() -> &'static str {
    APPLICATION_COLUMNS
}
