//! Core module: entities, record codec, file store and domain services

pub mod codec;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::{FormatError, ServiceError, StoreError, ValidationError};

/// Returns the current version of the `course-manager` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
