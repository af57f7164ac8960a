use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::SchoolSettings;
use sisprof_models::settings::UpdateSettingsDto;
use tracing::instrument;

pub struct SettingsService;

impl SettingsService {
    /// Stored settings, or the defaults when none were ever saved.
    #[instrument(skip(store))]
    pub async fn get_settings(store: &dyn Store) -> Result<SchoolSettings, AppError> {
        Ok(store.load_settings().await?.unwrap_or_default())
    }

    #[instrument(skip(store))]
    pub async fn update_settings(
        store: &dyn Store,
        dto: UpdateSettingsDto,
    ) -> Result<SchoolSettings, AppError> {
        let mut settings = Self::get_settings(store).await?;

        if let Some(school_name) = dto.school_name {
            settings.school_name = school_name;
        }
        if let Some(year) = dto.current_school_year {
            settings.current_school_year = year;
        }

        store.save_settings(&settings).await?;
        tracing::info!(school_year = settings.current_school_year, "school settings updated");

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use sisprof_db::MemoryStore;
    use sisprof_models::settings::DEFAULT_SCHOOL_NAME;

    #[tokio::test]
    async fn test_defaults_before_first_save() {
        let store = MemoryStore::new();
        let settings = SettingsService::get_settings(&store).await.unwrap();
        assert_eq!(settings.school_name, DEFAULT_SCHOOL_NAME);
        assert_eq!(settings.current_school_year, Utc::now().year());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let store = MemoryStore::new();
        SettingsService::update_settings(
            &store,
            UpdateSettingsDto {
                school_name: Some("Escola Estadual Modelo".to_string()),
                current_school_year: None,
            },
        )
        .await
        .unwrap();

        let settings = SettingsService::update_settings(
            &store,
            UpdateSettingsDto {
                school_name: None,
                current_school_year: Some(2025),
            },
        )
        .await
        .unwrap();

        assert_eq!(settings.school_name, "Escola Estadual Modelo");
        assert_eq!(settings.current_school_year, 2025);
        assert_eq!(SettingsService::get_settings(&store).await.unwrap(), settings);
    }
}
