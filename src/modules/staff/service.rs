use anyhow::anyhow;
use sisprof_config::ProvisioningConfig;
use sisprof_core::{AppError, Role};
use sisprof_db::Store;
use sisprof_models::Staff;
use sisprof_models::ids::StaffId;
use sisprof_models::staff::{CreateStaffDto, StaffCreatedResponse, StaffFilterParams, UpdateStaffDto};
use tracing::instrument;

use crate::modules::accounts::{AccountService, service::parse_email};

pub struct StaffService;

impl StaffService {
    #[instrument(skip(store, config))]
    pub async fn create_staff(
        store: &dyn Store,
        dto: CreateStaffDto,
        config: &ProvisioningConfig,
    ) -> Result<StaffCreatedResponse, AppError> {
        let email = parse_email(&dto.email)?;
        let pending = AccountService::prepare_unless_linked(
            dto.account_id.is_some(),
            &email,
            Role::Staff,
            config,
        )?;

        let staff = Staff {
            id: StaffId::new(),
            account_id: dto.account_id,
            name: dto.name,
            birth_date: dto.birth_date,
            email,
            phone: dto.phone,
            notification: dto.notification,
            position: dto.position,
            active: dto.active,
        };

        let (staff, account) = store
            .insert_staff(&staff, pending.as_ref().map(|p| &p.request))
            .await?;

        Ok(StaffCreatedResponse {
            staff,
            credentials: AccountService::finish(pending, account),
        })
    }

    #[instrument(skip(store))]
    pub async fn get_staff_members(
        store: &dyn Store,
        filters: StaffFilterParams,
    ) -> Result<Vec<Staff>, AppError> {
        Ok(store
            .list_staff()
            .await?
            .into_iter()
            .filter(|staff| filters.matches(staff))
            .collect())
    }

    #[instrument(skip(store))]
    pub async fn get_staff(store: &dyn Store, id: StaffId) -> Result<Staff, AppError> {
        store
            .get_staff(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Staff member not found")))
    }

    #[instrument(skip(store))]
    pub async fn update_staff(
        store: &dyn Store,
        id: StaffId,
        dto: UpdateStaffDto,
    ) -> Result<Staff, AppError> {
        let mut staff = Self::get_staff(store, id).await?;

        if let Some(name) = dto.name {
            staff.name = name;
        }
        if let Some(birth_date) = dto.birth_date {
            staff.birth_date = birth_date;
        }
        if let Some(email) = dto.email {
            staff.email = parse_email(&email)?;
        }
        if let Some(phone) = dto.phone {
            staff.phone = phone;
        }
        if let Some(notification) = dto.notification {
            staff.notification = notification;
        }
        if let Some(position) = dto.position {
            staff.position = position;
        }
        if let Some(active) = dto.active {
            staff.active = active;
        }

        store.update_staff(&staff).await?;
        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sisprof_db::{IdentityStore, MemoryStore};
    use sisprof_models::{NotificationPreference, StaffPosition};

    #[tokio::test]
    async fn test_staff_login_carries_staff_role() {
        let store = MemoryStore::new();
        let created = StaffService::create_staff(
            &store,
            CreateStaffDto {
                name: "Carlos Pereira".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1970, 12, 24).unwrap(),
                email: "carlos@escola.com".to_string(),
                phone: "5555-0000".to_string(),
                notification: NotificationPreference::Sms,
                position: StaffPosition::Doorkeeper,
                active: true,
                account_id: None,
            },
            &ProvisioningConfig {
                password_length: 10,
                bcrypt_cost: 4,
            },
        )
        .await
        .unwrap();

        let account = store.find_account_by_username("carlos").await.unwrap().unwrap();
        assert_eq!(account.roles, vec![Role::Staff]);
        assert_eq!(created.staff.account_id, Some(account.id));

        let doorkeepers = StaffService::get_staff_members(
            &store,
            StaffFilterParams {
                position: Some(StaffPosition::Doorkeeper),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(doorkeepers.len(), 1);
    }
}
