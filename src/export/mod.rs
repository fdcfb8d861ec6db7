//! Transaction exports: spreadsheet-friendly CSV and a full JSON snapshot.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::transaction::Transaction;
use crate::errors::StoreError;
use crate::ledger::Ledger;

pub const CSV_HEADERS: [&str; 7] = [
    "Date",
    "Type",
    "Category",
    "Amount",
    "Description",
    "Tags",
    "Currency",
];

/// Writes every transaction as one CSV row: ISO dates, category names
/// resolved from the ledger ("Unknown" when the reference dangles), and tags
/// joined with "; ".
pub fn write_transactions_csv<W: io::Write>(ledger: &Ledger, writer: W) -> Result<(), StoreError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;
    for txn in &ledger.transactions {
        let category = ledger
            .category(txn.category_id)
            .map(|category| category.name.as_str())
            .unwrap_or("Unknown");
        csv_writer.write_record([
            txn.date.format("%Y-%m-%d").to_string(),
            txn.kind.to_string(),
            category.to_string(),
            txn.amount.to_string(),
            txn.description.clone(),
            txn.tags.join("; "),
            txn.currency.clone(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_csv(ledger: &Ledger, path: &Path) -> Result<(), StoreError> {
    let file = File::create(path)?;
    write_transactions_csv(ledger, file)?;
    tracing::info!(path = %path.display(), rows = ledger.transactions.len(), "CSV export written");
    Ok(())
}

/// Portable snapshot: all transactions plus the custom categories needed to
/// interpret them. Preset categories travel with every install, so they are
/// left out.
#[derive(Debug, Serialize)]
pub struct DataExport<'a> {
    pub transactions: &'a [Transaction],
    pub categories: Vec<&'a Category>,
    pub export_date: DateTime<Utc>,
}

impl<'a> DataExport<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self {
            transactions: &ledger.transactions,
            categories: ledger
                .categories
                .iter()
                .filter(|category| !category.is_default)
                .collect(),
            export_date: Utc::now(),
        }
    }
}

pub fn export_json(ledger: &Ledger, path: &Path) -> Result<(), StoreError> {
    let payload = DataExport::new(ledger);
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "JSON export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryKind;
    use crate::domain::common::RecordId;
    use crate::domain::transaction::TransactionKind;
    use chrono::NaiveDate;

    #[test]
    fn csv_resolves_names_and_flags_unknowns() {
        let mut ledger = Ledger::with_defaults("Test");
        ledger.add_transaction(
            Transaction::new(
                TransactionKind::Expense,
                100.0,
                RecordId(1),
                RecordId(1),
                NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            )
            .with_description("weekly shop")
            .with_tags(vec!["food".into(), "weekly".into()]),
        );
        ledger.add_transaction(Transaction::new(
            TransactionKind::Expense,
            7.0,
            RecordId(999),
            RecordId(1),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
        ));

        let mut buffer = Vec::new();
        write_transactions_csv(&ledger, &mut buffer).expect("write csv");
        let text = String::from_utf8(buffer).expect("utf8 csv");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Date,Type,Category,Amount,Description,Tags,Currency");
        assert_eq!(
            lines[1],
            "2024-03-05,expense,Food & Dining,100,weekly shop,food; weekly,USD"
        );
        assert!(lines[2].contains("Unknown"));
    }

    #[test]
    fn json_export_skips_preset_categories() {
        let mut ledger = Ledger::with_defaults("Test");
        ledger.add_category(Category::new("Hobby", CategoryKind::Expense));
        let payload = DataExport::new(&ledger);
        assert_eq!(payload.categories.len(), 1);
        assert_eq!(payload.categories[0].name, "Hobby");
    }
}
