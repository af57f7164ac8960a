use std::collections::HashSet;

use anyhow::anyhow;
use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::classes::{
    ClassFilterParams, CreateClassDto, PaginatedClassesResponse, UpdateClassDto,
};
use sisprof_models::ids::ClassId;
use sisprof_models::{Class, Student};
use tracing::instrument;

use crate::modules::disciplines::service::DisciplineService;
use crate::modules::settings::service::SettingsService;

pub struct ClassService;

impl ClassService {
    /// Creates a class. Without an explicit year the class belongs to the
    /// school's current year.
    #[instrument(skip(store))]
    pub async fn create_class(store: &dyn Store, dto: CreateClassDto) -> Result<Class, AppError> {
        DisciplineService::ensure_exist(store, &dto.discipline_ids, "discipline_ids").await?;

        let school_year = match dto.school_year {
            Some(year) => year,
            None => SettingsService::get_settings(store).await?.current_school_year,
        };

        let class = Class {
            id: ClassId::new(),
            name: dto.name,
            shift: dto.shift,
            room: dto.room,
            school_year,
            discipline_ids: dto.discipline_ids,
        };
        store.insert_class(&class).await?;

        Ok(class)
    }

    #[instrument(skip(store))]
    pub async fn get_classes(
        store: &dyn Store,
        filters: ClassFilterParams,
    ) -> Result<PaginatedClassesResponse, AppError> {
        let classes: Vec<Class> = store
            .list_classes()
            .await?
            .into_iter()
            .filter(|class| filters.matches(class))
            .collect();

        let (data, meta) = filters.pagination.apply(classes);
        Ok(PaginatedClassesResponse { data, meta })
    }

    #[instrument(skip(store))]
    pub async fn get_class(store: &dyn Store, id: ClassId) -> Result<Class, AppError> {
        store
            .get_class(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))
    }

    #[instrument(skip(store))]
    pub async fn update_class(
        store: &dyn Store,
        id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let mut class = Self::get_class(store, id).await?;

        if let Some(name) = dto.name {
            class.name = name;
        }
        if let Some(shift) = dto.shift {
            class.shift = shift;
        }
        if let Some(room) = dto.room {
            class.room = room;
        }
        if let Some(year) = dto.school_year {
            class.school_year = year;
        }
        if let Some(discipline_ids) = dto.discipline_ids {
            DisciplineService::ensure_exist(store, &discipline_ids, "discipline_ids").await?;
            class.discipline_ids = discipline_ids;
        }

        store.update_class(&class).await?;
        Ok(class)
    }

    /// Students enrolled in the class, ordered by name.
    #[instrument(skip(store))]
    pub async fn get_roster(store: &dyn Store, id: ClassId) -> Result<Vec<Student>, AppError> {
        Self::get_class(store, id).await?;
        store.list_students_in_class(id).await
    }

    /// Rejects the request when any referenced class is unknown.
    pub async fn ensure_exist(
        store: &dyn Store,
        ids: &[ClassId],
        field: &str,
    ) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        let known: HashSet<ClassId> = store.list_classes().await?.into_iter().map(|c| c.id).collect();

        match ids.iter().find(|id| !known.contains(id)) {
            Some(id) => Err(AppError::invalid_field(
                field,
                format!("class {} does not exist", id),
            )),
            None => Ok(()),
        }
    }
}
