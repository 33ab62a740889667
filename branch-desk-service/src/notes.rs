use branch_desk_api::{ActorIdentity, ApiError, ApiResult, STAFF};
use branch_desk_db::models::{ApplicationModel, NoteModel, NoteNotFound};
use branch_desk_db::repository::{UnitOfWorkSession, UpdateBatch};
use chrono::Utc;
use uuid::Uuid;

use crate::access_guard::authorize;
use crate::context::{storage_error, ServiceContext};
use crate::pipeline::fetch_visible;

/// Rejects blank text; the text itself is stored exactly as given
fn require_text(text: &str) -> ApiResult<&str> {
    if text.trim().is_empty() {
        return Err(ApiError::validation("text", "Note text must not be empty"));
    }
    Ok(text)
}

fn note_not_found(err: NoteNotFound) -> ApiError {
    tracing::warn!(note_id = %err.0, "Note not found");
    ApiError::not_found("Note", err.0)
}

/// Notes of an application. Edits go through the same commit-or-discard
/// unit of work as other application writes but produce no audit entries.
#[derive(Clone)]
pub struct NoteLedger {
    ctx: ServiceContext,
}

impl NoteLedger {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn add_note(&self, actor: Option<&ActorIdentity>, application_id: i64, text: &str) -> ApiResult<NoteModel> {
        let actor = authorize(actor, STAFF)?;
        let text = require_text(text)?;

        let result = self
            .mutate(&actor, application_id, |application| {
                Ok(application.notes.append(text, &actor.username, Utc::now()).clone())
            })
            .await?;
        tracing::info!(application_id, note_id = %result.id, username = %actor.username, "Note added");
        Ok(result)
    }

    pub async fn update_note(
        &self,
        actor: Option<&ActorIdentity>,
        application_id: i64,
        note_id: Uuid,
        text: &str,
    ) -> ApiResult<ApplicationModel> {
        let actor = authorize(actor, STAFF)?;
        let text = require_text(text)?;

        self.mutate(&actor, application_id, |application| {
            application
                .notes
                .update(note_id, text, &actor.username)
                .map_err(note_not_found)?;
            Ok(application.clone())
        })
        .await
    }

    pub async fn remove_note(
        &self,
        actor: Option<&ActorIdentity>,
        application_id: i64,
        note_id: Uuid,
    ) -> ApiResult<ApplicationModel> {
        let actor = authorize(actor, STAFF)?;

        self.mutate(&actor, application_id, |application| {
            application.notes.remove(note_id).map_err(note_not_found)?;
            Ok(application.clone())
        })
        .await
    }

    async fn mutate<T>(
        &self,
        actor: &ActorIdentity,
        application_id: i64,
        edit: impl FnOnce(&mut ApplicationModel) -> ApiResult<T> + Send,
    ) -> ApiResult<T> {
        let session = self.ctx.begin().await?;
        let result = Self::mutate_in(&*session, actor, application_id, edit).await;
        let value = self.ctx.commit_or_discard(session, result).await?;
        self.ctx.invalidate_application(application_id).await;
        Ok(value)
    }

    async fn mutate_in<T>(
        session: &dyn UnitOfWorkSession,
        actor: &ActorIdentity,
        application_id: i64,
        edit: impl FnOnce(&mut ApplicationModel) -> ApiResult<T> + Send,
    ) -> ApiResult<T> {
        let mut application = fetch_visible(session, actor, application_id).await?;
        let value = edit(&mut application)?;
        session
            .applications()
            .update_batch(vec![application])
            .await
            .map_err(storage_error("save notes"))?;
        Ok(value)
    }
}
