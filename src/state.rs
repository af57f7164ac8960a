use std::fmt;
use std::sync::Arc;

use sisprof_config::{AcademicConfig, CorsConfig, DatabaseConfig, JwtConfig, ProvisioningConfig};
use sisprof_core::AppError;
use sisprof_db::{Store, init_store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub provisioning_config: ProvisioningConfig,
    pub academic_config: AcademicConfig,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("provisioning_config", &self.provisioning_config)
            .field("academic_config", &self.academic_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State over an existing store with every other setting read from the
    /// environment.
    pub fn from_env_with_store(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            provisioning_config: ProvisioningConfig::from_env(),
            academic_config: AcademicConfig::from_env(),
        }
    }
}

pub async fn init_app_state() -> Result<AppState, AppError> {
    let store = init_store(&DatabaseConfig::from_env()).await?;
    Ok(AppState::from_env_with_store(store))
}
