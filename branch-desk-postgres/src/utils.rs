use branch_desk_db::repository::UniqueViolation;
use heapless::String as HeaplessString;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use std::str::FromStr;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<HeaplessString<N>, Box<dyn Error + Send + Sync>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s).map_err(|_| {
        format!("Value for column '{col_name}' is too long (max {N} bytes)").into()
    })
}

/// Reports a unique-constraint rejection as [`UniqueViolation`]; other errors pass through
pub fn map_unique_violation(err: sqlx::Error) -> Box<dyn Error + Send + Sync> {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return Box::new(UniqueViolation::new(db_err.constraint().unwrap_or("unique")));
        }
    }
    Box::new(err)
}

/// Pages are bound as BIGINT
pub fn to_i64(value: usize) -> Result<i64, Box<dyn Error + Send + Sync>> {
    i64::try_from(value).map_err(|_| format!("Value {value} does not fit into BIGINT").into())
}

/// Counts come back as BIGINT
pub fn to_usize(value: i64) -> Result<usize, Box<dyn Error + Send + Sync>> {
    usize::try_from(value).map_err(|_| format!("Count {value} is negative").into())
}
