//! Payables, receivables and the ledger summary.
//!
//! Amounts are integer cents. Settling an item records the date it was
//! paid or received; settling twice is a conflict.

use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use sisprof_core::AppError;
use sisprof_db::Store;
use sisprof_models::finance::{
    CreatePayableDto, CreateReceivableDto, LedgerFilterParams, SettleDto, UpdatePayableDto,
    UpdateReceivableDto,
};
use sisprof_models::ids::{PayableId, ReceivableId};
use sisprof_models::{LedgerSummary, Payable, Receivable};
use tracing::instrument;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct FinanceService;

impl FinanceService {
    #[instrument(skip(store))]
    pub async fn create_payable(
        store: &dyn Store,
        dto: CreatePayableDto,
    ) -> Result<Payable, AppError> {
        let payable = Payable {
            id: PayableId::new(),
            description: dto.description,
            category: dto.category,
            amount_cents: dto.amount_cents,
            due_date: dto.due_date,
            paid_date: None,
            paid: false,
            note: dto.note,
        };
        store.insert_payable(&payable).await?;
        Ok(payable)
    }

    #[instrument(skip(store))]
    pub async fn get_payables(
        store: &dyn Store,
        filters: LedgerFilterParams,
    ) -> Result<Vec<Payable>, AppError> {
        let today = today();
        Ok(store
            .list_payables()
            .await?
            .into_iter()
            .filter(|payable| filters.matches_payable(payable, today))
            .collect())
    }

    #[instrument(skip(store))]
    pub async fn get_payable(store: &dyn Store, id: PayableId) -> Result<Payable, AppError> {
        store
            .get_payable(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Payable not found")))
    }

    #[instrument(skip(store))]
    pub async fn update_payable(
        store: &dyn Store,
        id: PayableId,
        dto: UpdatePayableDto,
    ) -> Result<Payable, AppError> {
        let mut payable = Self::get_payable(store, id).await?;

        if let Some(description) = dto.description {
            payable.description = description;
        }
        if let Some(category) = dto.category {
            payable.category = category;
        }
        if let Some(amount_cents) = dto.amount_cents {
            payable.amount_cents = amount_cents;
        }
        if let Some(due_date) = dto.due_date {
            payable.due_date = due_date;
        }
        if dto.note.is_some() {
            payable.note = dto.note;
        }

        store.update_payable(&payable).await?;
        Ok(payable)
    }

    #[instrument(skip(store))]
    pub async fn settle_payable(
        store: &dyn Store,
        id: PayableId,
        dto: SettleDto,
    ) -> Result<Payable, AppError> {
        let mut payable = Self::get_payable(store, id).await?;
        if payable.paid {
            return Err(AppError::conflict(anyhow!("Payable is already paid")));
        }

        payable.paid = true;
        payable.paid_date = Some(dto.date.unwrap_or_else(today));
        store.update_payable(&payable).await?;

        Ok(payable)
    }

    #[instrument(skip(store))]
    pub async fn create_receivable(
        store: &dyn Store,
        dto: CreateReceivableDto,
    ) -> Result<Receivable, AppError> {
        if store.get_student(dto.student_id).await?.is_none() {
            return Err(AppError::invalid_field(
                "student_id",
                format!("student {} does not exist", dto.student_id),
            ));
        }

        let receivable = Receivable {
            id: ReceivableId::new(),
            student_id: dto.student_id,
            description: dto.description,
            amount_cents: dto.amount_cents,
            due_date: dto.due_date,
            received_date: None,
            received: false,
            note: dto.note,
        };
        store.insert_receivable(&receivable).await?;
        Ok(receivable)
    }

    #[instrument(skip(store))]
    pub async fn get_receivables(
        store: &dyn Store,
        filters: LedgerFilterParams,
    ) -> Result<Vec<Receivable>, AppError> {
        let today = today();
        Ok(store
            .list_receivables()
            .await?
            .into_iter()
            .filter(|receivable| filters.matches_receivable(receivable, today))
            .collect())
    }

    #[instrument(skip(store))]
    pub async fn get_receivable(store: &dyn Store, id: ReceivableId) -> Result<Receivable, AppError> {
        store
            .get_receivable(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Receivable not found")))
    }

    #[instrument(skip(store))]
    pub async fn update_receivable(
        store: &dyn Store,
        id: ReceivableId,
        dto: UpdateReceivableDto,
    ) -> Result<Receivable, AppError> {
        let mut receivable = Self::get_receivable(store, id).await?;

        if let Some(description) = dto.description {
            receivable.description = description;
        }
        if let Some(amount_cents) = dto.amount_cents {
            receivable.amount_cents = amount_cents;
        }
        if let Some(due_date) = dto.due_date {
            receivable.due_date = due_date;
        }
        if dto.note.is_some() {
            receivable.note = dto.note;
        }

        store.update_receivable(&receivable).await?;
        Ok(receivable)
    }

    #[instrument(skip(store))]
    pub async fn settle_receivable(
        store: &dyn Store,
        id: ReceivableId,
        dto: SettleDto,
    ) -> Result<Receivable, AppError> {
        let mut receivable = Self::get_receivable(store, id).await?;
        if receivable.received {
            return Err(AppError::conflict(anyhow!("Receivable is already received")));
        }

        receivable.received = true;
        receivable.received_date = Some(dto.date.unwrap_or_else(today));
        store.update_receivable(&receivable).await?;

        Ok(receivable)
    }

    #[instrument(skip(store))]
    pub async fn get_summary(store: &dyn Store) -> Result<LedgerSummary, AppError> {
        let payables = store.list_payables().await?;
        let receivables = store.list_receivables().await?;
        Ok(LedgerSummary::compute(&payables, &receivables, today()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sisprof_models::PayableCategory;
    use sisprof_models::ids::StudentId;

    use crate::utils::fixtures::school;

    fn conta_de_luz(due_date: NaiveDate) -> CreatePayableDto {
        CreatePayableDto {
            description: "Conta de luz".to_string(),
            category: PayableCategory::Electricity,
            amount_cents: 45_000,
            due_date,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_settle_twice_is_conflict() {
        let school = school().await;
        let payable = FinanceService::create_payable(&school.store, conta_de_luz(today()))
            .await
            .unwrap();

        let paid_on = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let settled = FinanceService::settle_payable(
            &school.store,
            payable.id,
            SettleDto {
                date: Some(paid_on),
            },
        )
        .await
        .unwrap();
        assert!(settled.paid);
        assert_eq!(settled.paid_date, Some(paid_on));

        let err = FinanceService::settle_payable(&school.store, payable.id, SettleDto::default())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 409);
    }

    #[tokio::test]
    async fn test_overdue_filter() {
        let school = school().await;
        let last_year = today() - chrono::Days::new(365);
        FinanceService::create_payable(&school.store, conta_de_luz(last_year))
            .await
            .unwrap();
        FinanceService::create_payable(&school.store, conta_de_luz(today() + chrono::Days::new(30)))
            .await
            .unwrap();

        let overdue = FinanceService::get_payables(
            &school.store,
            LedgerFilterParams {
                overdue: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].due_date, last_year);
    }

    #[tokio::test]
    async fn test_receivable_needs_known_student() {
        let school = school().await;
        let dto = |student_id| CreateReceivableDto {
            student_id,
            description: "Mensalidade março".to_string(),
            amount_cents: 80_000,
            due_date: today(),
            note: None,
        };

        let err = FinanceService::create_receivable(&school.store, dto(StudentId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 422);

        let receivable = FinanceService::create_receivable(&school.store, dto(school.ana))
            .await
            .unwrap();
        FinanceService::settle_receivable(&school.store, receivable.id, SettleDto::default())
            .await
            .unwrap();

        let summary = FinanceService::get_summary(&school.store).await.unwrap();
        assert_eq!(summary.receivables_received_cents, 80_000);
        assert_eq!(summary.balance_cents, 80_000);
    }
}
