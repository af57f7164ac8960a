use std::collections::HashSet;

use anyhow::anyhow;
use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::Discipline;
use sisprof_models::disciplines::{CreateDisciplineDto, UpdateDisciplineDto};
use sisprof_models::ids::DisciplineId;
use tracing::instrument;

pub struct DisciplineService;

impl DisciplineService {
    #[instrument(skip(store))]
    pub async fn create_discipline(
        store: &dyn Store,
        dto: CreateDisciplineDto,
    ) -> Result<Discipline, AppError> {
        let discipline = Discipline {
            id: DisciplineId::new(),
            name: dto.name,
            description: dto.description,
        };
        store.insert_discipline(&discipline).await?;
        Ok(discipline)
    }

    #[instrument(skip(store))]
    pub async fn get_disciplines(store: &dyn Store) -> Result<Vec<Discipline>, AppError> {
        store.list_disciplines().await
    }

    #[instrument(skip(store))]
    pub async fn get_discipline(store: &dyn Store, id: DisciplineId) -> Result<Discipline, AppError> {
        store
            .get_discipline(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Discipline not found")))
    }

    #[instrument(skip(store))]
    pub async fn update_discipline(
        store: &dyn Store,
        id: DisciplineId,
        dto: UpdateDisciplineDto,
    ) -> Result<Discipline, AppError> {
        let mut discipline = Self::get_discipline(store, id).await?;

        if let Some(name) = dto.name {
            discipline.name = name;
        }
        if dto.description.is_some() {
            discipline.description = dto.description;
        }

        store.update_discipline(&discipline).await?;
        Ok(discipline)
    }

    /// Rejects the request when any referenced discipline is unknown.
    pub async fn ensure_exist(
        store: &dyn Store,
        ids: &[DisciplineId],
        field: &str,
    ) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        let known: HashSet<DisciplineId> =
            store.list_disciplines().await?.into_iter().map(|d| d.id).collect();

        match ids.iter().find(|id| !known.contains(id)) {
            Some(id) => Err(AppError::invalid_field(
                field,
                format!("discipline {} does not exist", id),
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sisprof_db::MemoryStore;

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let store = MemoryStore::new();
        let created = DisciplineService::create_discipline(
            &store,
            CreateDisciplineDto {
                name: "Matemática".to_string(),
                description: Some("Álgebra e geometria".to_string()),
            },
        )
        .await
        .unwrap();

        let updated = DisciplineService::update_discipline(
            &store,
            created.id,
            UpdateDisciplineDto {
                name: Some("Matemática I".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Matemática I");
        assert_eq!(updated.description.as_deref(), Some("Álgebra e geometria"));
    }

    #[tokio::test]
    async fn test_ensure_exist_names_the_field() {
        let store = MemoryStore::new();
        let err = DisciplineService::ensure_exist(&store, &[DisciplineId::new()], "discipline_ids")
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);
        assert!(err.fields.unwrap().contains_key("discipline_ids"));

        assert!(DisciplineService::ensure_exist(&store, &[], "discipline_ids").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_discipline_is_not_found() {
        let store = MemoryStore::new();
        let err = DisciplineService::get_discipline(&store, DisciplineId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }
}
