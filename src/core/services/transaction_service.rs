use chrono::{NaiveDate, Utc};

use crate::core::services::account_service::{AccountService, BalanceDirection};
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::common::RecordId;
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::ledger::Ledger;

/// Operations for recording and maintaining transactions.
pub struct TransactionService;

impl TransactionService {
    pub fn add(ledger: &mut Ledger, transaction: Transaction) -> ServiceResult<RecordId> {
        if transaction.amount < 0.0 {
            return Err(ServiceError::Invalid(
                "transaction amount must not be negative".into(),
            ));
        }
        if transaction.is_transfer()
            && (transaction.from_account_id.is_none() || transaction.to_account_id.is_none())
        {
            return Err(ServiceError::Invalid(
                "transfer records need both endpoints".into(),
            ));
        }
        let id = ledger.add_transaction(transaction);
        tracing::debug!(%id, "transaction recorded");
        Ok(id)
    }

    pub fn update(
        ledger: &mut Ledger,
        id: RecordId,
        mutate: impl FnOnce(&mut Transaction),
    ) -> ServiceResult<()> {
        let transaction = ledger
            .transaction_mut(id)
            .ok_or_else(|| ServiceError::Invalid(format!("transaction {id} not found")))?;
        mutate(transaction);
        transaction.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: RecordId) -> ServiceResult<Transaction> {
        ledger
            .remove_transaction(id)
            .ok_or_else(|| ServiceError::Invalid(format!("transaction {id} not found")))
    }

    pub fn list(ledger: &Ledger) -> &[Transaction] {
        &ledger.transactions
    }

    /// Moves money between two accounts and records the matching transfer.
    ///
    /// The three writes land independently: source balance, destination
    /// balance, then the transfer record. The audit scan reports ledgers where
    /// only part of the sequence survived.
    pub fn transfer(
        ledger: &mut Ledger,
        from: RecordId,
        to: RecordId,
        amount: f64,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> ServiceResult<RecordId> {
        if from == to {
            return Err(ServiceError::Invalid(
                "transfer endpoints must be different accounts".into(),
            ));
        }
        if amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "transfer amount must be positive".into(),
            ));
        }
        let currency = ledger
            .account(from)
            .ok_or_else(|| ServiceError::Invalid(format!("source account {from} not found")))?
            .currency
            .clone();
        if ledger.account(to).is_none() {
            return Err(ServiceError::Invalid(format!(
                "destination account {to} not found"
            )));
        }

        AccountService::adjust_balance(ledger, from, amount, BalanceDirection::Subtract)?;
        AccountService::adjust_balance(ledger, to, amount, BalanceDirection::Add)?;

        let mut record = Transaction::new(
            TransactionKind::Transfer,
            amount,
            RecordId::TRANSFER_CATEGORY,
            from,
            date,
        )
        .with_description(description)
        .with_currency(currency)
        .with_tags(vec!["transfer".to_string()]);
        record.from_account_id = Some(from);
        record.to_account_id = Some(to);

        let id = ledger.add_transaction(record);
        tracing::info!(%from, %to, amount, "transfer recorded");
        Ok(id)
    }
}
