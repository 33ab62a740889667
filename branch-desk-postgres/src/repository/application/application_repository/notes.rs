use branch_desk_db::models::application::{ApplicationModel, NoteModel, NoteSequence};
use sqlx::PgConnection;
use std::collections::HashMap;
use std::error::Error;

use crate::utils::TryFromRow;

/// Loads the ordered notes of every application in `ids`
pub(crate) async fn load_notes(
    conn: &mut PgConnection,
    ids: &[i64],
) -> Result<HashMap<i64, Vec<NoteModel>>, Box<dyn Error + Send + Sync>> {
    let mut notes: HashMap<i64, Vec<NoteModel>> = HashMap::new();
    if ids.is_empty() {
        return Ok(notes);
    }

    let rows = sqlx::query(
        r#"
        SELECT application_id, id, text, created_at, created_by, is_updated, updated_by
        FROM application_note
        WHERE application_id = ANY($1)
        ORDER BY application_id, position
        "#,
    )
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    for row in rows {
        let application_id: i64 = sqlx::Row::try_get(&row, "application_id")?;
        notes
            .entry(application_id)
            .or_default()
            .push(NoteModel::try_from_row(&row)?);
    }
    Ok(notes)
}

/// Attaches loaded notes to their applications
pub(crate) async fn attach_notes(
    conn: &mut PgConnection,
    applications: &mut [ApplicationModel],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let ids: Vec<i64> = applications.iter().map(|a| a.id).collect();
    let mut notes = load_notes(conn, &ids).await?;
    for application in applications.iter_mut() {
        application.notes = NoteSequence::from(notes.remove(&application.id).unwrap_or_default());
    }
    Ok(())
}

/// Rewrites the stored note sequence of `application` with its current notes
pub(crate) async fn replace_notes(
    conn: &mut PgConnection,
    application: &ApplicationModel,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    sqlx::query("DELETE FROM application_note WHERE application_id = $1")
        .bind(application.id)
        .execute(&mut *conn)
        .await?;

    for (position, note) in application.notes.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO application_note
                (id, application_id, position, text, created_at, created_by, is_updated, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(note.id)
        .bind(application.id)
        .bind(i32::try_from(position)?)
        .bind(&note.text)
        .bind(note.created_at)
        .bind(&note.created_by)
        .bind(note.is_updated)
        .bind(note.updated_by.as_deref())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
