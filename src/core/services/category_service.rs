use chrono::Utc;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::category::Category;
use crate::domain::common::RecordId;
use crate::ledger::Ledger;

/// Operations for maintaining classification categories.
pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, category: Category) -> ServiceResult<RecordId> {
        Self::validate_name(ledger, &category.name, None)?;
        Ok(ledger.add_category(category))
    }

    /// Applies the mutator to a copy and only commits once the result passes
    /// validation, so a rejected rename leaves the category untouched.
    pub fn update(
        ledger: &mut Ledger,
        id: RecordId,
        mutate: impl FnOnce(&mut Category),
    ) -> ServiceResult<()> {
        let index = ledger
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| ServiceError::Invalid(format!("category {id} not found")))?;
        let mut updated = ledger.categories[index].clone();
        mutate(&mut updated);
        updated.id = id;
        if updated.name != ledger.categories[index].name {
            Self::validate_name(ledger, &updated.name, Some(id))?;
        }
        updated.updated_at = Utc::now();
        ledger.categories[index] = updated;
        ledger.touch();
        Ok(())
    }

    /// Preset categories are protected; custom ones go away even when
    /// transactions still reference them. Orphaned references simply drop out
    /// of breakdowns.
    pub fn remove(ledger: &mut Ledger, id: RecordId) -> ServiceResult<Category> {
        let category = ledger
            .category(id)
            .ok_or_else(|| ServiceError::Invalid(format!("category {id} not found")))?;
        if category.is_default {
            return Err(ServiceError::Forbidden(
                "default categories cannot be deleted".into(),
            ));
        }
        ledger
            .remove_category(id)
            .ok_or_else(|| ServiceError::Invalid(format!("category {id} not found")))
    }

    pub fn list(ledger: &Ledger) -> &[Category] {
        &ledger.categories
    }

    fn validate_name(ledger: &Ledger, name: &str, skip: Option<RecordId>) -> ServiceResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Invalid(
                "category name must not be empty".into(),
            ));
        }
        let lowered = trimmed.to_ascii_lowercase();
        let duplicate = ledger.categories.iter().any(|category| {
            skip != Some(category.id) && category.name.to_ascii_lowercase() == lowered
        });
        if duplicate {
            return Err(ServiceError::Invalid(format!(
                "category named '{trimmed}' already exists"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryKind;
    use crate::domain::transaction::{Transaction, TransactionKind};
    use chrono::NaiveDate;

    fn base_ledger() -> Ledger {
        Ledger::with_defaults("Test")
    }

    #[test]
    fn preset_categories_cannot_be_removed() {
        let mut ledger = base_ledger();
        let err = CategoryService::remove(&mut ledger, RecordId(1)).expect_err("preset");
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert_eq!(ledger.categories.len(), 15);
    }

    #[test]
    fn custom_categories_are_removable_with_history() {
        let mut ledger = base_ledger();
        let id = CategoryService::add(
            &mut ledger,
            Category::new("Subscriptions", CategoryKind::Expense),
        )
        .unwrap();
        ledger.add_transaction(Transaction::new(
            TransactionKind::Expense,
            9.99,
            id,
            RecordId(1),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ));
        let removed = CategoryService::remove(&mut ledger, id).unwrap();
        assert_eq!(removed.name, "Subscriptions");
        // The transaction stays behind with a dangling category.
        assert_eq!(ledger.transactions.len(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut ledger = base_ledger();
        let err = CategoryService::add(
            &mut ledger,
            Category::new("food & dining", CategoryKind::Expense),
        )
        .expect_err("duplicate");
        assert!(matches!(err, ServiceError::Invalid(_)));
    }
}
