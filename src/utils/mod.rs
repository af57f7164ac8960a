//! Utility modules for the SisProf API.
//!
//! - [`auth_helpers`]: resolving the caller's person records for ownership checks

pub mod auth_helpers;

#[cfg(test)]
pub mod fixtures;
