use anyhow::anyhow;
use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::Guardian;
use sisprof_models::guardians::{CreateGuardianDto, GuardianFilterParams, UpdateGuardianDto};
use sisprof_models::ids::GuardianId;
use tracing::instrument;

use crate::modules::accounts::service::parse_email;

pub struct GuardianService;

impl GuardianService {
    /// A student has at most one guardian; a second one is a conflict.
    #[instrument(skip(store))]
    pub async fn create_guardian(
        store: &dyn Store,
        dto: CreateGuardianDto,
    ) -> Result<Guardian, AppError> {
        let email = parse_email(&dto.email)?;
        if store.get_student(dto.student_id).await?.is_none() {
            return Err(AppError::invalid_field(
                "student_id",
                format!("student {} does not exist", dto.student_id),
            ));
        }

        let guardian = Guardian {
            id: GuardianId::new(),
            student_id: dto.student_id,
            name: dto.name,
            birth_date: dto.birth_date,
            email,
            phone: dto.phone,
            notification: dto.notification,
            relationship: dto.relationship,
            cpf: dto.cpf,
        };
        store.insert_guardian(&guardian).await?;

        Ok(guardian)
    }

    #[instrument(skip(store))]
    pub async fn get_guardians(
        store: &dyn Store,
        filters: GuardianFilterParams,
    ) -> Result<Vec<Guardian>, AppError> {
        Ok(store
            .list_guardians()
            .await?
            .into_iter()
            .filter(|guardian| {
                filters
                    .student_id
                    .is_none_or(|id| guardian.student_id == id)
            })
            .collect())
    }

    #[instrument(skip(store))]
    pub async fn get_guardian(store: &dyn Store, id: GuardianId) -> Result<Guardian, AppError> {
        store
            .get_guardian(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Guardian not found")))
    }

    #[instrument(skip(store))]
    pub async fn update_guardian(
        store: &dyn Store,
        id: GuardianId,
        dto: UpdateGuardianDto,
    ) -> Result<Guardian, AppError> {
        let mut guardian = Self::get_guardian(store, id).await?;

        if let Some(name) = dto.name {
            guardian.name = name;
        }
        if let Some(birth_date) = dto.birth_date {
            guardian.birth_date = birth_date;
        }
        if let Some(email) = dto.email {
            guardian.email = parse_email(&email)?;
        }
        if let Some(phone) = dto.phone {
            guardian.phone = phone;
        }
        if let Some(notification) = dto.notification {
            guardian.notification = notification;
        }
        if let Some(relationship) = dto.relationship {
            guardian.relationship = relationship;
        }
        if dto.cpf.is_some() {
            guardian.cpf = dto.cpf;
        }

        store.update_guardian(&guardian).await?;
        Ok(guardian)
    }

    #[instrument(skip(store))]
    pub async fn delete_guardian(store: &dyn Store, id: GuardianId) -> Result<(), AppError> {
        if !store.delete_guardian(id).await? {
            return Err(AppError::not_found(anyhow!("Guardian not found")));
        }
        Ok(())
    }
}
