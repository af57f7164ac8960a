//! # SisProf Core
//!
//! Core types, errors, and utilities for the SisProf API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for list responses
//! - [`password`]: Password hashing, verification and generation
//! - [`roles`]: The closed set of access-control roles
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use sisprof_core::errors::AppError;
//! use sisprof_core::password::{generate_password, hash_password};
//! use sisprof_core::roles::Role;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Lesson not found"));
//! let password = generate_password(10);
//! let hash = hash_password(&password)?;
//! assert_eq!(Role::Teacher.group_name(), "Professores");
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod roles;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{generate_password, hash_password, hash_password_with_cost, verify_password};
pub use roles::Role;
