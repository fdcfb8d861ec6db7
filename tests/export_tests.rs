use std::fs;

use chrono::{DateTime, NaiveDate};
use daybook_core::core::services::ReportService;
use daybook_core::domain::category::{Category, CategoryKind};
use daybook_core::domain::common::RecordId;
use daybook_core::domain::transaction::{Transaction, TransactionKind};
use daybook_core::export::{export_csv, export_json};
use daybook_core::ledger::Ledger;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn busy_ledger() -> Ledger {
    let mut ledger = Ledger::with_defaults("Export");
    ledger.add_category(Category::new("Hobby", CategoryKind::Expense));
    ledger.add_transaction(Transaction::new(
        TransactionKind::Income,
        1000.0,
        RecordId(11),
        RecordId(1),
        date(2024, 6, 1),
    ));
    ledger.add_transaction(
        Transaction::new(
            TransactionKind::Expense,
            250.5,
            RecordId(1),
            RecordId(1),
            date(2024, 6, 8),
        )
        .with_description("groceries, twice"),
    );
    ledger.add_transaction(Transaction::new(
        TransactionKind::Expense,
        100.0,
        RecordId(16),
        RecordId(1),
        date(2024, 6, 12),
    ));
    ledger
}

#[test]
fn csv_export_reproduces_the_ledger_aggregates() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("transactions.csv");
    let ledger = busy_ledger();
    export_csv(&ledger, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let mut income = 0.0;
    let mut expense = 0.0;
    let mut rows = 0;
    for record in reader.records() {
        let record = record.unwrap();
        let amount: f64 = record[3].parse().unwrap();
        match &record[1] {
            "income" => income += amount,
            "expense" => expense += amount,
            other => panic!("unexpected kind {other}"),
        }
        rows += 1;
    }

    assert_eq!(rows, ledger.transactions.len());
    assert_eq!(
        income,
        ReportService::sum_amounts(&ledger.transactions, Some(TransactionKind::Income))
    );
    assert_eq!(
        expense,
        ReportService::sum_amounts(&ledger.transactions, Some(TransactionKind::Expense))
    );
}

#[test]
fn csv_export_quotes_awkward_descriptions() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("transactions.csv");
    export_csv(&busy_ledger(), &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    // The comma in the description must not split the row.
    assert!(text.contains("\"groceries, twice\""));
    let mut reader = csv::Reader::from_path(&path).unwrap();
    for record in reader.records() {
        assert_eq!(record.unwrap().len(), 7);
    }
}

#[test]
fn json_export_carries_custom_categories_and_a_timestamp() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("daybook.json");
    let ledger = busy_ledger();
    export_json(&ledger, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(
        value["transactions"].as_array().unwrap().len(),
        ledger.transactions.len()
    );
    let categories = value["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Hobby");
    let stamp = value["export_date"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
}
