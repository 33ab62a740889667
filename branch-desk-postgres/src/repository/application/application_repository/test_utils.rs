#[cfg(test)]
pub mod test_utils {
    use branch_desk_api::ApplicationStatus;
    use branch_desk_db::models::application::{ApplicationModel, NoteSequence};
    use branch_desk_db::models::staff::BranchModel;
    use branch_desk_db::repository::create_batch::CreateBatch;
    use chrono::Utc;
    use heapless::String as HeaplessString;
    use uuid::Uuid;

    use crate::test_helper::TestContext;

    pub fn create_test_application(client_name: &str, branch_id: i64) -> ApplicationModel {
        ApplicationModel {
            id: 0,
            client_name: client_name.to_string(),
            phone_number: HeaplessString::try_from("79001234567").unwrap(),
            product: "Consumer loan".to_string(),
            status: ApplicationStatus::InProgress,
            branch_id,
            notes: NoteSequence::new(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: Utc::now(),
        }
    }

    /// Branch names are unique, so every call creates a fresh name
    pub async fn create_test_branch(ctx: &TestContext) -> Result<BranchModel, Box<dyn std::error::Error + Send + Sync>> {
        let name = format!("Branch {}", &Uuid::new_v4().simple().to_string()[..8]);
        let branch = BranchModel {
            id: 0,
            name: HeaplessString::try_from(name.as_str()).unwrap(),
            created_at: Utc::now(),
        };
        let mut saved = ctx.staff_repos().branch_repository.create_batch(vec![branch]).await?;
        Ok(saved.remove(0))
    }
}
