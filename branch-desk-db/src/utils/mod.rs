use branch_desk_api::{ApiError, ApiResult};
use heapless::String as HeaplessString;

/// Bytes needed to hold `chars` characters of any script in UTF-8.
pub const fn utf8_capacity(chars: usize) -> usize {
    chars * 4
}

/// Converts a caller-supplied string into a bounded column value.
///
/// `max_chars` is counted in characters, like the `VARCHAR` column and the
/// input validators. `N` is the byte capacity of the buffer and should be
/// `utf8_capacity(max_chars)`.
pub fn bounded<const N: usize>(field: &str, value: &str, max_chars: usize) -> ApiResult<HeaplessString<N>> {
    let too_long = || ApiError::validation(field, format!("must be at most {max_chars} characters"));
    if value.chars().count() > max_chars {
        return Err(too_long());
    }
    HeaplessString::try_from(value).map_err(|_| too_long())
}
