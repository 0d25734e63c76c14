//! Text rules that keep every field writable as part of one data line
//!
//! Nothing is escaped on disk, so values are refused instead:
//! - every field: no `|` and no line break
//! - names listed inside a field (instructors): also no `,`
//! - course names and letter grades, which appear in `course:grade:letter`
//!   entries: also no `,` and no `:`
//! - free text in the last field (feedback messages): no line break only

use super::course::NONE_PLACEHOLDER;
use crate::core::error::ValidationError;

const LINE_BREAKS: &[char] = &['\n', '\r'];
const FIELD: &[char] = &['|', '\n', '\r'];
const LIST_ITEM: &[char] = &['|', '\n', '\r', ','];
const ENTRY_PART: &[char] = &['|', '\n', '\r', ',', ':'];

fn reject(field: &'static str, value: &str, forbidden: &[char]) -> Result<(), ValidationError> {
    match value.chars().find(|c| forbidden.contains(c)) {
        Some(found) => Err(ValidationError::ForbiddenCharacter { field, found }),
        None => Ok(()),
    }
}

pub(crate) fn non_blank(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value)
    }
}

/// One `|`-separated field
pub(crate) fn single_field(field: &'static str, value: &str) -> Result<(), ValidationError> {
    reject(field, value, FIELD)
}

/// A required `|`-separated field
pub(crate) fn required_field(
    field: &'static str,
    value: String,
) -> Result<String, ValidationError> {
    let value = non_blank(field, value)?;
    single_field(field, &value)?;
    Ok(value)
}

/// A name that is stored inside a `,`-joined list
pub(crate) fn list_item(field: &'static str, value: &str) -> Result<(), ValidationError> {
    reject(field, value, LIST_ITEM)
}

/// A required part of a `course:grade:letter` entry
pub(crate) fn entry_part(field: &'static str, value: String) -> Result<String, ValidationError> {
    let value = non_blank(field, value)?;
    reject(field, &value, ENTRY_PART)?;
    Ok(value)
}

/// Trailing free text, which may hold `|` but must stay on one line
pub(crate) fn free_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    reject(field, value, LINE_BREAKS)
}

/// Whether `value` reads as the `None` placeholder, in any casing
#[must_use]
pub(crate) fn is_placeholder(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(NONE_PLACEHOLDER)
}

/// Refuse a name that would be read back as an empty list
pub(crate) fn not_placeholder(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_placeholder(value) {
        Err(ValidationError::ReservedName {
            field,
            value: value.to_string(),
        })
    } else {
        Ok(())
    }
}
