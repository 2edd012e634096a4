//! Category naming rules.
//!
//! Category names are compared case-insensitively after trimming. The
//! PostgreSQL side enforces the same rule with a unique index on
//! `LOWER(name)`; [`category_names_match`] is the in-process equivalent.

use std::borrow::Cow;

use validator::ValidationError;

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Trim a free-text category name, returning `None` when nothing is left.
///
/// ```
/// use catalog_core::category::normalize_category_name;
///
/// assert_eq!(normalize_category_name(Some("  Widgets ")), Some("Widgets".to_string()));
/// assert_eq!(normalize_category_name(Some("   ")), None);
/// assert_eq!(normalize_category_name(None), None);
/// ```
pub fn normalize_category_name(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Validator for a free-text category name: the trimmed name must fit in
/// [`MAX_CATEGORY_NAME_LEN`] characters. Blank input passes, since it means
/// "no new category".
pub fn category_name_fits(value: &str) -> Result<(), ValidationError> {
    match normalize_category_name(Some(value)) {
        Some(name) if name.chars().count() > MAX_CATEGORY_NAME_LEN => {
            Err(ValidationError::new("length").with_message(Cow::Owned(format!(
                "must be at most {MAX_CATEGORY_NAME_LEN} characters"
            ))))
        }
        _ => Ok(()),
    }
}

/// Whether two category names refer to the same category.
pub fn category_names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
