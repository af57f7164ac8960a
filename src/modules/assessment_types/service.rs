use anyhow::anyhow;
use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::AssessmentType;
use sisprof_models::assessments::{CreateAssessmentTypeDto, UpdateAssessmentTypeDto};
use sisprof_models::ids::AssessmentTypeId;
use tracing::instrument;

pub struct AssessmentTypeService;

impl AssessmentTypeService {
    #[instrument(skip(store))]
    pub async fn create_assessment_type(
        store: &dyn Store,
        dto: CreateAssessmentTypeDto,
    ) -> Result<AssessmentType, AppError> {
        let assessment_type = AssessmentType {
            id: AssessmentTypeId::new(),
            name: dto.name,
            weight: dto.weight,
        };
        store.insert_assessment_type(&assessment_type).await?;
        Ok(assessment_type)
    }

    #[instrument(skip(store))]
    pub async fn get_assessment_types(store: &dyn Store) -> Result<Vec<AssessmentType>, AppError> {
        store.list_assessment_types().await
    }

    #[instrument(skip(store))]
    pub async fn get_assessment_type(
        store: &dyn Store,
        id: AssessmentTypeId,
    ) -> Result<AssessmentType, AppError> {
        store
            .get_assessment_type(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Assessment type not found")))
    }

    #[instrument(skip(store))]
    pub async fn update_assessment_type(
        store: &dyn Store,
        id: AssessmentTypeId,
        dto: UpdateAssessmentTypeDto,
    ) -> Result<AssessmentType, AppError> {
        let mut assessment_type = Self::get_assessment_type(store, id).await?;

        if let Some(name) = dto.name {
            assessment_type.name = name;
        }
        if let Some(weight) = dto.weight {
            assessment_type.weight = weight;
        }

        store.update_assessment_type(&assessment_type).await?;
        Ok(assessment_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sisprof_db::MemoryStore;

    #[tokio::test]
    async fn test_create_and_rename() {
        let store = MemoryStore::new();
        let prova = AssessmentTypeService::create_assessment_type(
            &store,
            CreateAssessmentTypeDto {
                name: "Prova".to_string(),
                weight: 2.0,
            },
        )
        .await
        .unwrap();

        let renamed = AssessmentTypeService::update_assessment_type(
            &store,
            prova.id,
            UpdateAssessmentTypeDto {
                name: Some("Prova bimestral".to_string()),
                weight: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(renamed.name, "Prova bimestral");
        assert_eq!(renamed.weight, 2.0);
        assert_eq!(
            AssessmentTypeService::get_assessment_types(&store)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
