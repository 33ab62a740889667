use branch_desk_api::{ActorIdentity, ApplicationStatus, ApplicationUpdate, FieldValue};
use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::application::note::NoteSequence;
use crate::models::identifiable::Identifiable;
use crate::models::tracked::{Tracked, TrackedField};
use crate::utils::{bounded, utf8_capacity};

pub const PHONE_NUMBER_MAX_CHARS: usize = 20;

/// Database model for a client application (loan or service request)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationModel {
    /// Store-assigned id, 0 until created
    pub id: i64,
    pub client_name: String,
    pub phone_number: HeaplessString<{ utf8_capacity(PHONE_NUMBER_MAX_CHARS) }>,
    pub product: String,
    pub status: ApplicationStatus,
    /// References BranchModel.id
    pub branch_id: i64,
    pub notes: NoteSequence,

    /// Soft delete marker; applications are never removed physically
    pub is_deleted: bool,
    /// Always set when `is_deleted` is true
    pub deleted_at: Option<DateTime<Utc>>,
    /// Username of the deleting actor
    pub deleted_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl ApplicationModel {
    /// Managers never see soft-deleted applications; admins see everything
    pub fn is_visible_to(&self, actor: &ActorIdentity) -> bool {
        actor.is_admin() || !self.is_deleted
    }

    /// Marks the application deleted by `actor`.
    ///
    /// Returns `false` and leaves the deletion stamp untouched when the
    /// application was already deleted.
    pub fn soft_delete(&mut self, actor: &str, now: DateTime<Utc>) -> bool {
        if self.is_deleted {
            return false;
        }
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.deleted_by = Some(actor.to_string());
        true
    }
}

impl Identifiable for ApplicationModel {
    type Id = i64;

    fn get_id(&self) -> i64 {
        self.id
    }
}

static APPLICATION_FIELDS: [TrackedField<ApplicationModel, ApplicationUpdate>; 5] = [
    TrackedField {
        name: "client_name",
        read: |a| FieldValue::text(a.client_name.as_str()),
        proposed: |p| p.client_name.as_deref().map(FieldValue::text),
        apply: |a, p| {
            if let Some(value) = &p.client_name {
                a.client_name = value.clone();
            }
            Ok(())
        },
    },
    TrackedField {
        name: "phone_number",
        read: |a| FieldValue::text(a.phone_number.as_str()),
        proposed: |p| p.phone_number.as_deref().map(FieldValue::text),
        apply: |a, p| {
            if let Some(value) = &p.phone_number {
                a.phone_number = bounded("phone_number", value, PHONE_NUMBER_MAX_CHARS)?;
            }
            Ok(())
        },
    },
    TrackedField {
        name: "product",
        read: |a| FieldValue::text(a.product.as_str()),
        proposed: |p| p.product.as_deref().map(FieldValue::text),
        apply: |a, p| {
            if let Some(value) = &p.product {
                a.product = value.clone();
            }
            Ok(())
        },
    },
    TrackedField {
        name: "status",
        read: |a| FieldValue::text(a.status.as_str()),
        proposed: |p| p.status.map(|s| FieldValue::text(s.as_str())),
        apply: |a, p| {
            if let Some(status) = p.status {
                a.status = status;
            }
            Ok(())
        },
    },
    TrackedField {
        name: "branch_id",
        read: |a| FieldValue::Integer(a.branch_id),
        proposed: |p| p.branch_id.map(|b| FieldValue::Integer(b.get())),
        apply: |a, p| {
            if let Some(branch_id) = p.branch_id {
                a.branch_id = branch_id.get();
            }
            Ok(())
        },
    },
];

impl Tracked for ApplicationModel {
    type Patch = ApplicationUpdate;

    fn tracked_fields() -> &'static [TrackedField<Self, ApplicationUpdate>] {
        &APPLICATION_FIELDS
    }
}
