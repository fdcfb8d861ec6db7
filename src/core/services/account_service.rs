use chrono::Utc;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::account::Account;
use crate::domain::common::RecordId;
use crate::ledger::Ledger;

/// Which way a balance adjustment moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDirection {
    Add,
    Subtract,
}

/// Operations for maintaining accounts and their balances.
pub struct AccountService;

impl AccountService {
    pub fn add(ledger: &mut Ledger, account: Account) -> ServiceResult<RecordId> {
        Self::validate_name(ledger, &account.name, None)?;
        Ok(ledger.add_account(account))
    }

    pub fn update(
        ledger: &mut Ledger,
        id: RecordId,
        mutate: impl FnOnce(&mut Account),
    ) -> ServiceResult<()> {
        let account = ledger
            .account_mut(id)
            .ok_or_else(|| ServiceError::Invalid(format!("account {id} not found")))?;
        mutate(account);
        account.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    /// Accounts with recorded transactions cannot be removed; the history
    /// would lose its anchor.
    pub fn remove(ledger: &mut Ledger, id: RecordId) -> ServiceResult<()> {
        if ledger.account(id).is_none() {
            return Err(ServiceError::Invalid(format!("account {id} not found")));
        }
        if ledger.transactions.iter().any(|txn| txn.account_id == id) {
            return Err(ServiceError::Forbidden(
                "account has recorded transactions".into(),
            ));
        }
        ledger.remove_account(id);
        Ok(())
    }

    pub fn adjust_balance(
        ledger: &mut Ledger,
        id: RecordId,
        amount: f64,
        direction: BalanceDirection,
    ) -> ServiceResult<f64> {
        let account = ledger
            .account_mut(id)
            .ok_or_else(|| ServiceError::Invalid(format!("account {id} not found")))?;
        match direction {
            BalanceDirection::Add => account.balance += amount,
            BalanceDirection::Subtract => account.balance -= amount,
        }
        account.updated_at = Utc::now();
        let balance = account.balance;
        ledger.touch();
        Ok(balance)
    }

    pub fn total_balance(ledger: &Ledger) -> f64 {
        ledger.accounts.iter().map(|account| account.balance).sum()
    }

    pub fn list(ledger: &Ledger) -> &[Account] {
        &ledger.accounts
    }

    fn validate_name(ledger: &Ledger, name: &str, skip: Option<RecordId>) -> ServiceResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Invalid("account name must not be empty".into()));
        }
        let lowered = trimmed.to_ascii_lowercase();
        let duplicate = ledger.accounts.iter().any(|account| {
            skip != Some(account.id) && account.name.to_ascii_lowercase() == lowered
        });
        if duplicate {
            return Err(ServiceError::Invalid(format!(
                "account named '{trimmed}' already exists"
            )));
        }
        Ok(())
    }
}
