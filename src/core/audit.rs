//! Consistency scan over a loaded ledger. Reports problems without mutating
//! anything; repairs go through the owning services.

use std::collections::HashSet;

use crate::core::services::{PlanService, ServiceResult};
use crate::domain::category::CategoryKind;
use crate::domain::common::RecordId;
use crate::ledger::Ledger;

/// Collects human-readable warnings for records that reference missing
/// entities or disagree with derived values. An empty result means the ledger
/// is internally consistent.
pub fn scan(ledger: &Ledger) -> Vec<String> {
    let mut warnings = Vec::new();

    let account_ids: HashSet<RecordId> = ledger.accounts.iter().map(|a| a.id).collect();
    let category_ids: HashSet<RecordId> = ledger.categories.iter().map(|c| c.id).collect();

    for txn in &ledger.transactions {
        if !account_ids.contains(&txn.account_id) {
            warnings.push(format!(
                "transaction {} references unknown account {}",
                txn.id, txn.account_id
            ));
        }
        if txn.is_transfer() {
            match (txn.from_account_id, txn.to_account_id) {
                (Some(from), Some(to)) => {
                    if !account_ids.contains(&from) {
                        warnings.push(format!(
                            "transfer {} references unknown source account {from}",
                            txn.id
                        ));
                    }
                    if !account_ids.contains(&to) {
                        warnings.push(format!(
                            "transfer {} references unknown destination account {to}",
                            txn.id
                        ));
                    }
                }
                _ => warnings.push(format!("transfer {} is missing an endpoint", txn.id)),
            }
        } else {
            match ledger.category(txn.category_id) {
                None => warnings.push(format!(
                    "transaction {} references missing category {}",
                    txn.id, txn.category_id
                )),
                Some(category) if !category.kind.matches(txn.kind) => warnings.push(format!(
                    "transaction {} is {} but category '{}' classifies {}",
                    txn.id, txn.kind, category.name, category.kind
                )),
                Some(_) => {}
            }
        }
    }

    for budget in &ledger.budgets {
        match ledger.category(budget.category_id) {
            None => warnings.push(format!(
                "budget {} references missing category {}",
                budget.id, budget.category_id
            )),
            Some(category) if category.kind != CategoryKind::Expense => warnings.push(format!(
                "budget {} targets income category '{}'",
                budget.id, category.name
            )),
            Some(_) => {}
        }
    }

    let planned = PlanService::planned_trip_days(ledger);
    for balance in &ledger.holiday_balances {
        if balance.planned_days != planned {
            warnings.push(format!(
                "holiday balance {} plans {} days but confirmed trips reserve {planned}",
                balance.year, balance.planned_days
            ));
        }
        let expected =
            balance.total_days as i32 - balance.used_days as i32 - balance.planned_days as i32;
        if balance.available_days != expected {
            warnings.push(format!(
                "holiday balance {} reports {} available days, expected {expected}",
                balance.year, balance.available_days
            ));
        }
    }

    warnings
}

/// Recomputes every stored holiday balance from confirmed trips, returning
/// the years whose numbers changed. Dangling references have no safe
/// automatic fix and stay in the scan output.
pub fn repair_holiday_balances(ledger: &mut Ledger) -> ServiceResult<Vec<i32>> {
    let years: Vec<i32> = ledger.holiday_balances.iter().map(|b| b.year).collect();
    let mut repaired = Vec::new();
    for year in years {
        let before = ledger.holiday_balance(year).cloned();
        let after = PlanService::refresh_holiday_balance(ledger, year)?;
        let changed = before.map_or(true, |b| {
            b.planned_days != after.planned_days || b.available_days != after.available_days
        });
        if changed {
            repaired.push(year);
        }
    }
    Ok(repaired)
}
