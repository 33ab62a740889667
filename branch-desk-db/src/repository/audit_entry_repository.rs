use crate::models::audit::AuditEntryModel;
use crate::repository::create_batch::CreateBatch;
use crate::repository::find_by_id::FindById;
use crate::repository::load_audits::LoadAudits;

/// Append-only store access for audit entries; no update or delete exists
pub trait AuditEntryRepository: CreateBatch<AuditEntryModel> + FindById<AuditEntryModel> + LoadAudits {}

impl<R> AuditEntryRepository for R where R: CreateBatch<AuditEntryModel> + FindById<AuditEntryModel> + LoadAudits {}
