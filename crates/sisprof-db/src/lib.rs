//! # SisProf DB
//!
//! Record store traits and their two implementations:
//!
//! - [`PgStore`]: PostgreSQL through SQLx, with embedded migrations
//! - [`MemoryStore`]: process-local maps, used by tests and `STORE_BACKEND=memory`
//!
//! # Example
//!
//! ```ignore
//! use sisprof_config::DatabaseConfig;
//! use sisprof_db::init_store;
//!
//! let store = init_store(&DatabaseConfig::from_env()).await?;
//! let classes = store.list_classes().await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use sisprof_config::{DatabaseConfig, StoreBackend};
use sisprof_core::AppError;
use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{
    AcademicStore, DirectoryStore, IdentityStore, LedgerStore, NoticeStore, SettingsStore, Store,
    StoreResult,
};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens a PostgreSQL connection pool.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| AppError::internal(anyhow!("DATABASE_URL must be set")))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Builds the configured store. Postgres stores are migrated before use.
pub async fn init_store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, AppError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = init_db_pool(config).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
