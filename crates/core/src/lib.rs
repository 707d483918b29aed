//! # Mission Core
//!
//! Core business logic for the mission records service.
//!
//! This crate contains pure data operations:
//! - The SQLite resource store (`db`) with one query module per table
//! - The soft-delete policy shared by patients and cases
//! - Per-resource services that validate input and enforce visibility rules
//!
//! **No API concerns**: authentication, HTTP servers and presentation belong in `api-rest` or
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod soft_delete;
pub mod validation;

pub use config::CoreConfig;
pub use db::{Database, DbError, DbResult, SharedDatabase};
pub use error::{ConfigError, ServiceError, ServiceResult};
pub use soft_delete::{Deletable, Deletion};

pub use mission_types::NonEmptyText;
