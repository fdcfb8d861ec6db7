use chrono::Utc;

use crate::core::services::{ReportService, ServiceError, ServiceResult};
use crate::domain::budget::Budget;
use crate::domain::category::CategoryKind;
use crate::domain::common::RecordId;
use crate::domain::reporting::BudgetProgress;
use crate::errors::StoreError;
use crate::ledger::Ledger;

/// Operations for maintaining spending budgets.
pub struct BudgetService;

impl BudgetService {
    pub fn add(ledger: &mut Ledger, budget: Budget) -> ServiceResult<RecordId> {
        Self::validate(ledger, &budget)?;
        Ok(ledger.add_budget(budget))
    }

    pub fn update(
        ledger: &mut Ledger,
        id: RecordId,
        mutate: impl FnOnce(&mut Budget),
    ) -> ServiceResult<()> {
        let index = ledger
            .budgets
            .iter()
            .position(|budget| budget.id == id)
            .ok_or_else(|| ServiceError::Invalid(format!("budget {id} not found")))?;
        let mut updated = ledger.budgets[index].clone();
        mutate(&mut updated);
        updated.id = id;
        Self::validate(ledger, &updated)?;
        updated.updated_at = Utc::now();
        ledger.budgets[index] = updated;
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: RecordId) -> ServiceResult<Budget> {
        ledger
            .remove_budget(id)
            .ok_or_else(|| ServiceError::Invalid(format!("budget {id} not found")))
    }

    pub fn list(ledger: &Ledger) -> &[Budget] {
        &ledger.budgets
    }

    /// Progress over the budget's anchor window.
    pub fn progress(ledger: &Ledger, id: RecordId) -> ServiceResult<BudgetProgress> {
        let budget = ledger
            .budget(id)
            .ok_or_else(|| ServiceError::Invalid(format!("budget {id} not found")))?;
        Ok(ReportService::budget_progress(budget, &ledger.transactions))
    }

    fn validate(ledger: &Ledger, budget: &Budget) -> ServiceResult<()> {
        if budget.amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "budget amount must be positive".into(),
            ));
        }
        match ledger.category(budget.category_id) {
            None => Err(StoreError::InvalidRef(format!(
                "budget references missing category {}",
                budget.category_id
            ))
            .into()),
            Some(category) if category.kind != CategoryKind::Expense => {
                Err(ServiceError::Invalid(format!(
                    "budgets track expense categories, '{}' is income",
                    category.name
                )))
            }
            Some(_) => Ok(()),
        }
    }
}
