//! Schema bootstrap from the crate's SQL directories.
//!
//! `migrations/` is applied in file-name order, `cleanup/` in reverse file-name
//! order. Every file is executed as one raw script and must be re-runnable.

use sqlx::PgPool;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn directory(&self) -> PathBuf {
        let name = match self {
            Direction::Up => "migrations",
            Direction::Down => "cleanup",
        };
        Path::new(env!("CARGO_MANIFEST_DIR")).join(name)
    }
}

/// Creates the branch desk schema; returns the applied file names
///
/// ```rust,no_run
/// # async fn example(pool: &sqlx::PgPool) -> Result<(), sqlx::Error> {
/// let applied = branch_desk_postgres::init_database(pool).await?;
/// assert!(!applied.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    run_scripts(pool, Direction::Up).await
}

/// Drops every table and type created by [`init_database`]
pub async fn cleanup_database(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    run_scripts(pool, Direction::Down).await
}

fn sql_files(dir: &Path, direction: Direction) -> Result<Vec<PathBuf>, sqlx::Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(sqlx::Error::Io)? {
        let path = entry.map_err(sqlx::Error::Io)?.path();
        if path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();
    if direction == Direction::Down {
        files.reverse();
    }
    Ok(files)
}

async fn run_scripts(pool: &PgPool, direction: Direction) -> Result<Vec<String>, sqlx::Error> {
    let mut applied = Vec::new();
    for path in sql_files(&direction.directory(), direction)? {
        let script = std::fs::read_to_string(&path).map_err(sqlx::Error::Io)?;
        tracing::info!(file = %path.display(), ?direction, "Running schema script");
        sqlx::raw_sql(&script).execute(pool).await?;
        applied.push(
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }
    Ok(applied)
}
