use branch_desk_api::{ApiResult, FieldValue, FieldValues};

/// One field of an entity whose changes are recorded in the audit trail.
///
/// `read` captures the current value, `proposed` extracts the value carried by
/// a patch (`None` when the patch leaves the field untouched) and `apply`
/// writes the patch value into the entity.
pub struct TrackedField<T, P> {
    pub name: &'static str,
    pub read: fn(&T) -> FieldValue,
    pub proposed: fn(&P) -> Option<FieldValue>,
    pub apply: fn(&mut T, &P) -> ApiResult<()>,
}

/// Entities with a statically declared set of audited fields
pub trait Tracked: Sized + 'static {
    /// The partial update type applied to this entity
    type Patch;

    /// Tracked fields in declaration order; audit entries list changed fields in this order
    fn tracked_fields() -> &'static [TrackedField<Self, Self::Patch>];

    fn tracked_field_names() -> Vec<&'static str> {
        Self::tracked_fields().iter().map(|f| f.name).collect()
    }

    /// Captures the current value of every tracked field
    fn snapshot(&self) -> FieldValues {
        Self::tracked_fields()
            .iter()
            .map(|f| (f.name.to_string(), (f.read)(self)))
            .collect()
    }

    /// Collects the values present in `patch`; absent fields are left out
    fn proposed(patch: &Self::Patch) -> FieldValues {
        Self::tracked_fields()
            .iter()
            .filter_map(|f| (f.proposed)(patch).map(|v| (f.name.to_string(), v)))
            .collect()
    }

    /// Overwrites every field present in `patch`
    fn apply_patch(&mut self, patch: &Self::Patch) -> ApiResult<()> {
        for field in Self::tracked_fields() {
            (field.apply)(self, patch)?;
        }
        Ok(())
    }
}
