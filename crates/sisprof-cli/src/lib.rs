//! # SisProf CLI
//!
//! Administration and seeding utilities shared by the `sisprof-cli` binary.
//! Both work against any [`sisprof_db::Store`], so they run the same way on
//! Postgres and on the in-memory store.
//!
//! ## Usage
//!
//! ```ignore
//! use sisprof_cli::seeder::{SeedConfig, seed_all};
//!
//! let config = SeedConfig::default().with_classes(4);
//! let summary = seed_all(store.as_ref(), &config, 12).await?;
//! ```

pub mod director;
pub mod seeder;
