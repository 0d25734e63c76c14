//! Course management library for `coursemgr`
//! Persistence, domain entities and services shared by every client of the data files.

pub mod config;
pub mod core;
pub mod logger;

pub use crate::core::get_version;
