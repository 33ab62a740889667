use std::cmp::Ordering;

use branch_desk_api::{ApplicationStatus, SortDirection};
use serde::{Deserialize, Serialize};

use super::application::ApplicationModel;

/// Columns an application listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationSortField {
    Id,
    ClientName,
    PhoneNumber,
    Product,
    Status,
    BranchId,
    CreatedAt,
    IsDeleted,
    DeletedAt,
    DeletedBy,
}

impl ApplicationSortField {
    /// Resolves a caller-supplied field name, `None` for unknown names
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "id" => Some(Self::Id),
            "client_name" | "clientName" => Some(Self::ClientName),
            "phone_number" | "phoneNumber" => Some(Self::PhoneNumber),
            "product" => Some(Self::Product),
            "status" => Some(Self::Status),
            "branch_id" | "branchId" => Some(Self::BranchId),
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "is_deleted" | "isDeleted" => Some(Self::IsDeleted),
            "deleted_at" | "deletedAt" => Some(Self::DeletedAt),
            "deleted_by" | "deletedBy" => Some(Self::DeletedBy),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ClientName => "client_name",
            Self::PhoneNumber => "phone_number",
            Self::Product => "product",
            Self::Status => "status",
            Self::BranchId => "branch_id",
            Self::CreatedAt => "created_at",
            Self::IsDeleted => "is_deleted",
            Self::DeletedAt => "deleted_at",
            Self::DeletedBy => "deleted_by",
        }
    }

    /// Missing values order before present ones, ascending
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::DeletedAt | Self::DeletedBy)
    }

    fn compare(&self, a: &ApplicationModel, b: &ApplicationModel) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::ClientName => a.client_name.cmp(&b.client_name),
            Self::PhoneNumber => a.phone_number.cmp(&b.phone_number),
            Self::Product => a.product.cmp(&b.product),
            Self::Status => a.status.cmp(&b.status),
            Self::BranchId => a.branch_id.cmp(&b.branch_id),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::IsDeleted => a.is_deleted.cmp(&b.is_deleted),
            Self::DeletedAt => a.deleted_at.cmp(&b.deleted_at),
            Self::DeletedBy => a.deleted_by.cmp(&b.deleted_by),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: ApplicationSortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: ApplicationSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Resolved selection over applications, shared by the listing, the counts
/// and every store implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCriteria {
    /// Selects the soft-deleted set instead of the live one
    pub deleted: bool,
    pub branch_id: Option<i64>,
    pub status: Option<ApplicationStatus>,
    /// Lowercased, trimmed, never empty
    search: Option<String>,
    sort: Vec<SortKey>,
}

impl ApplicationCriteria {
    pub fn live() -> Self {
        Self::default()
    }

    pub fn deleted() -> Self {
        Self {
            deleted: true,
            ..Self::default()
        }
    }

    pub fn with_branch(mut self, branch_id: Option<i64>) -> Self {
        self.branch_id = branch_id;
        self
    }

    pub fn with_status(mut self, status: Option<ApplicationStatus>) -> Self {
        self.status = status;
        self
    }

    /// Blank search terms select everything
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// The requested keys followed by `id` ascending; `id` ascending alone when nothing was requested
    pub fn effective_sort(&self) -> Vec<SortKey> {
        let mut keys = self.sort.clone();
        if !keys.iter().any(|k| k.field == ApplicationSortField::Id) {
            keys.push(SortKey::new(ApplicationSortField::Id, SortDirection::Asc));
        }
        keys
    }

    /// `LIKE` pattern for the search term with wildcards escaped
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|term| {
            let escaped = term
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }

    pub fn matches(&self, application: &ApplicationModel) -> bool {
        if application.is_deleted != self.deleted {
            return false;
        }
        if self.branch_id.is_some_and(|b| b != application.branch_id) {
            return false;
        }
        if self.status.is_some_and(|s| s != application.status) {
            return false;
        }
        match &self.search {
            Some(term) => {
                application.phone_number.to_lowercase().contains(term)
                    || application.client_name.to_lowercase().contains(term)
            }
            None => true,
        }
    }

    pub fn compare(&self, a: &ApplicationModel, b: &ApplicationModel) -> Ordering {
        for key in self.effective_sort() {
            let ordering = match key.direction {
                SortDirection::Asc => key.field.compare(a, b),
                SortDirection::Desc => key.field.compare(b, a),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Totals over the filtered, pre-pagination set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: i64,
    pub in_progress: i64,
    pub closed: i64,
    pub transferred: i64,
}

impl StatusCounts {
    pub fn record(&mut self, status: ApplicationStatus, count: i64) {
        self.total += count;
        match status {
            ApplicationStatus::InProgress => self.in_progress += count,
            ApplicationStatus::Closed => self.closed += count,
            ApplicationStatus::Transferred => self.transferred += count,
        }
    }
}

/// Number of matching applications per branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCount {
    pub branch_id: i64,
    pub count: i64,
}
