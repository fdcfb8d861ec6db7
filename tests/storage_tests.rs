mod common;

use chrono::NaiveDate;
use daybook_core::domain::budget::{Budget, BudgetPeriod};
use daybook_core::domain::common::RecordId;
use daybook_core::domain::diary::{DiaryEntry, Mood};
use daybook_core::domain::plan::{Plan, PlanKind, PlanStatus};
use daybook_core::domain::task::Task;
use daybook_core::domain::transaction::{Transaction, TransactionKind};
use daybook_core::errors::StoreError;
use daybook_core::ledger::Ledger;
use daybook_core::storage::StorageBackend;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_expense() -> Transaction {
    Transaction::new(
        TransactionKind::Expense,
        42.0,
        RecordId(1),
        RecordId(1),
        date(2024, 6, 10),
    )
    .with_description("groceries")
}

fn populated_ledger(name: &str) -> Ledger {
    let mut ledger = Ledger::with_defaults(name);
    ledger.add_transaction(sample_expense());
    ledger.add_budget(Budget::new(
        RecordId(1),
        300.0,
        BudgetPeriod::Monthly,
        date(2024, 6, 1),
    ));
    ledger.add_task(Task::new("water the plants").with_due_date(date(2024, 6, 20)));
    ledger.add_plan(
        Plan::new("Lisbon", PlanKind::Trip, date(2024, 7, 1), date(2024, 7, 5))
            .with_status(PlanStatus::Confirmed)
            .with_holidays_used(5),
    );
    ledger.add_diary_entry(DiaryEntry::new(
        date(2024, 6, 10),
        "slow day",
        "nothing much happened",
        Mood::Okay,
    ));
    ledger
}

#[test]
fn a_fully_populated_ledger_survives_the_disk_round_trip() {
    let (storage, _config) = common::setup_test_env();
    let original = populated_ledger("Everything");
    storage.save(&original, "Everything").unwrap();

    let loaded = storage.load("Everything").unwrap();
    assert_eq!(loaded.name, "Everything");
    assert_eq!(loaded.transactions.len(), 1);
    assert_eq!(loaded.transactions[0].description, "groceries");
    assert_eq!(loaded.budgets.len(), 1);
    assert_eq!(loaded.budgets[0].period, BudgetPeriod::Monthly);
    assert_eq!(loaded.tasks.len(), 1);
    assert_eq!(loaded.tasks[0].due_date, Some(date(2024, 6, 20)));
    assert_eq!(loaded.plans.len(), 1);
    assert_eq!(loaded.plans[0].status, PlanStatus::Confirmed);
    assert_eq!(loaded.diary.len(), 1);
    assert_eq!(loaded.diary[0].mood, Mood::Okay);
    assert_eq!(loaded.settings.currency, original.settings.currency);
}

#[test]
fn saving_over_an_existing_ledger_leaves_a_backup_trail() {
    let (storage, _config) = common::setup_test_env();
    let mut ledger = Ledger::with_defaults("Trail");
    storage.save(&ledger, "Trail").unwrap();
    assert!(storage.list_backups("Trail").unwrap().is_empty());

    ledger.add_transaction(sample_expense());
    storage.save(&ledger, "Trail").unwrap();
    assert_eq!(storage.list_backups("Trail").unwrap().len(), 1);
}

#[test]
fn restore_rolls_the_ledger_back() {
    let (storage, _config) = common::setup_test_env();
    let mut ledger = Ledger::with_defaults("Rollback");
    storage.save(&ledger, "Rollback").unwrap();
    ledger.add_transaction(sample_expense());
    storage.save(&ledger, "Rollback").unwrap();

    let backups = storage.list_backups("Rollback").unwrap();
    let restored = storage.restore("Rollback", &backups[0]).unwrap();
    assert!(restored.transactions.is_empty());

    let reloaded = storage.load("Rollback").unwrap();
    assert!(reloaded.transactions.is_empty());
}

#[test]
fn ledger_names_list_in_canonical_sorted_form() {
    let (storage, _config) = common::setup_test_env();
    storage
        .save(&Ledger::with_defaults("Work Stuff"), "Work Stuff")
        .unwrap();
    storage
        .save(&Ledger::with_defaults("Personal"), "Personal")
        .unwrap();

    let names = storage.list_ledgers().unwrap();
    assert_eq!(names, vec!["personal".to_string(), "work_stuff".to_string()]);
    assert!(storage.ledger_exists("Personal"));
    assert!(!storage.ledger_exists("Shared"));
}

#[test]
fn missing_ledgers_error_on_load_but_seed_on_init() {
    let (storage, _config) = common::setup_test_env();
    let err = storage.load("Nope").unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));

    let seeded = storage.load_or_init("Nope").unwrap();
    assert_eq!(seeded.categories.len(), 15);
    // Seeding is in-memory only until the first save.
    assert!(!storage.ledger_exists("Nope"));
}

#[test]
fn config_lives_beside_the_ledgers() {
    let (storage, manager) = common::setup_test_env();
    let mut config = manager.load().unwrap();
    config.last_opened_ledger = Some("personal".into());
    config.trend_months = 12;
    manager.save(&config).unwrap();

    storage
        .save(&Ledger::with_defaults("Personal"), "Personal")
        .unwrap();

    let reloaded = manager.load().unwrap();
    assert_eq!(reloaded.last_opened_ledger.as_deref(), Some("personal"));
    assert_eq!(reloaded.trend_months, 12);
    assert!(manager.path().exists());
    assert!(storage.ledger_path("Personal").exists());
}
