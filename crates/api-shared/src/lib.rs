//! # API Shared
//!
//! Shared utilities and definitions for mission APIs.
//!
//! Contains:
//! - Request payload types (`dto` module) accepted by every write endpoint
//! - The client credential registry and `Authenticator`
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`, `mission-core` and `mission-cli`.

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{AuthError, AuthMode, Authenticator, ClientRegistry, Credentials, RegistryError};
pub use health::{HealthRes, HealthService};
