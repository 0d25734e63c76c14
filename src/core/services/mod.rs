//! Domain services: user accounts, the course catalogue and the registrar that
//! ties them together
//!
//! Every mutating call persists its whole collection before returning. Changes
//! are made on a copy and only committed to memory after the save succeeds, so a
//! failed save leaves memory matching the file.

pub mod courses;
pub mod registrar;
pub mod users;

pub use courses::{BoundaryScan, CourseManager, CourseUpdate};
pub use registrar::{GradeOutcome, Registrar};
pub use users::{UserService, UserUpdate};

use crate::core::error::{ServiceResult, StoreError};

/// Apply `mutate` to a copy of `items`, persist the copy, then commit it
///
/// Nothing is persisted or committed if `mutate` fails; nothing is committed if
/// `persist` fails.
pub(crate) fn stage_and_persist<T, R>(
    items: &mut Vec<T>,
    mutate: impl FnOnce(&mut Vec<T>) -> ServiceResult<R>,
    persist: impl FnOnce(&[T]) -> Result<(), StoreError>,
) -> ServiceResult<R>
where
    T: Clone,
{
    let mut staged = items.clone();
    let outcome = mutate(&mut staged)?;
    persist(&staged)?;
    *items = staged;
    Ok(outcome)
}
