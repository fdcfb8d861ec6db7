use chrono::NaiveDate;
use daybook_core::core::audit;
use daybook_core::core::services::{
    AccountService, BalanceDirection, BudgetService, CategoryService, DiaryService, PlanService,
    ReportService, TaskService, TransactionService,
};
use daybook_core::domain::account::{Account, AccountKind};
use daybook_core::domain::budget::{Budget, BudgetPeriod};
use daybook_core::domain::category::{Category, CategoryKind};
use daybook_core::domain::common::RecordId;
use daybook_core::domain::diary::{DiaryEntry, Mood};
use daybook_core::domain::plan::{Plan, PlanKind, PlanStatus};
use daybook_core::domain::reporting::DateWindow;
use daybook_core::domain::task::{Task, TaskStatus};
use daybook_core::domain::transaction::{Transaction, TransactionKind};
use daybook_core::ledger::Ledger;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expense(amount: f64, category: i64, day: u32) -> Transaction {
    Transaction::new(
        TransactionKind::Expense,
        amount,
        RecordId(category),
        RecordId(1),
        date(2024, 6, day),
    )
}

#[test]
fn a_month_of_activity_flows_through_every_service() {
    let mut ledger = Ledger::with_defaults("June");
    AccountService::adjust_balance(&mut ledger, RecordId(1), 500.0, BalanceDirection::Add)
        .unwrap();

    let hobby = CategoryService::add(&mut ledger, Category::new("Hobby", CategoryKind::Expense))
        .unwrap();
    TransactionService::add(
        &mut ledger,
        Transaction::new(
            TransactionKind::Income,
            3000.0,
            RecordId(11),
            RecordId(1),
            date(2024, 6, 1),
        )
        .with_description("salary"),
    )
    .unwrap();
    TransactionService::add(&mut ledger, expense(120.0, 1, 8).with_description("groceries"))
        .unwrap();
    TransactionService::add(
        &mut ledger,
        Transaction::new(
            TransactionKind::Expense,
            60.0,
            hobby,
            RecordId(1),
            date(2024, 6, 12),
        ),
    )
    .unwrap();
    TransactionService::transfer(
        &mut ledger,
        RecordId(1),
        RecordId(2),
        200.0,
        date(2024, 6, 15),
        "monthly savings",
    )
    .unwrap();

    let budget_id = BudgetService::add(
        &mut ledger,
        Budget::new(RecordId(1), 300.0, BudgetPeriod::Monthly, date(2024, 6, 1)),
    )
    .unwrap();
    let task_id = TaskService::add(
        &mut ledger,
        Task::new("pay rent").with_due_date(date(2024, 6, 28)),
    )
    .unwrap();
    TaskService::toggle_status(&mut ledger, task_id).unwrap();
    PlanService::add(
        &mut ledger,
        Plan::new("Lisbon", PlanKind::Trip, date(2024, 7, 1), date(2024, 7, 5))
            .with_status(PlanStatus::Confirmed)
            .with_holidays_used(5),
    )
    .unwrap();
    let holidays = PlanService::refresh_holiday_balance(&mut ledger, 2024).unwrap();
    DiaryService::add(
        &mut ledger,
        DiaryEntry::new(date(2024, 6, 30), "June recap", "quiet month", Mood::Good),
    )
    .unwrap();

    let window = DateWindow::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap();
    let totals = ReportService::window_totals(&ledger.transactions, &window);
    assert_eq!(totals.income, 3000.0);
    assert_eq!(totals.expense, 180.0);
    assert_eq!(totals.balance, 2820.0);

    let budget = ledger.budget(budget_id).unwrap();
    let progress = ReportService::budget_progress_at(budget, &ledger.transactions, date(2024, 6, 20));
    assert_eq!(progress.spent, 120.0);
    assert_eq!(progress.percentage, 40.0);

    assert_eq!(ledger.account(RecordId(1)).unwrap().balance, 300.0);
    assert_eq!(ledger.account(RecordId(2)).unwrap().balance, 200.0);
    assert_eq!(holidays.available_days, 15);
    assert_eq!(ledger.task(task_id).unwrap().status, TaskStatus::Completed);
    assert_eq!(DiaryService::list(&ledger).len(), 1);
    assert!(audit::scan(&ledger).is_empty());
}

#[test]
fn deleting_a_used_category_leaves_an_audit_trail() {
    let mut ledger = Ledger::with_defaults("Cleanup");
    let custom = CategoryService::add(
        &mut ledger,
        Category::new("Subscriptions", CategoryKind::Expense),
    )
    .unwrap();
    TransactionService::add(&mut ledger, expense(9.99, custom.0, 3)).unwrap();

    CategoryService::remove(&mut ledger, custom).unwrap();

    assert!(ledger.category(custom).is_none());
    assert_eq!(ledger.transactions.len(), 1);
    let warnings = audit::scan(&ledger);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("category"));
}

#[test]
fn transfer_currency_follows_the_source_account() {
    let mut ledger = Ledger::with_defaults("Travel");
    let travel_card = AccountService::add(
        &mut ledger,
        Account::new("Travel Card", AccountKind::Bank).with_currency("EUR"),
    )
    .unwrap();
    AccountService::adjust_balance(&mut ledger, travel_card, 400.0, BalanceDirection::Add)
        .unwrap();

    let id = TransactionService::transfer(
        &mut ledger,
        travel_card,
        RecordId(2),
        150.0,
        date(2024, 6, 2),
        "back home",
    )
    .unwrap();

    let record = ledger.transaction(id).unwrap();
    assert_eq!(record.currency, "EUR");
    assert_eq!(record.kind, TransactionKind::Transfer);
    assert_eq!(ledger.account(travel_card).unwrap().balance, 250.0);
}

#[test]
fn holiday_balance_tracks_plan_status_changes() {
    let mut ledger = Ledger::with_defaults("Holidays");
    let trip = PlanService::add(
        &mut ledger,
        Plan::new("Oslo", PlanKind::Trip, date(2024, 9, 1), date(2024, 9, 4))
            .with_holidays_used(3),
    )
    .unwrap();

    let before = PlanService::refresh_holiday_balance(&mut ledger, 2024).unwrap();
    assert_eq!(before.planned_days, 0);
    assert_eq!(before.available_days, 20);

    PlanService::update(&mut ledger, trip, |plan| {
        plan.status = PlanStatus::Confirmed;
    })
    .unwrap();
    let after = PlanService::refresh_holiday_balance(&mut ledger, 2024).unwrap();
    assert_eq!(after.planned_days, 3);
    assert_eq!(after.available_days, 17);
}

#[test]
fn wiped_ledgers_keep_presets_working() {
    let mut ledger = Ledger::with_defaults("Wipe");
    CategoryService::add(&mut ledger, Category::new("Hobby", CategoryKind::Expense)).unwrap();
    TransactionService::add(&mut ledger, expense(10.0, 1, 4)).unwrap();
    BudgetService::add(
        &mut ledger,
        Budget::new(RecordId(1), 100.0, BudgetPeriod::Monthly, date(2024, 6, 1)),
    )
    .unwrap();

    ledger.clear_data();

    assert!(ledger.transactions.is_empty());
    assert!(ledger.budgets.is_empty());
    assert_eq!(ledger.categories.len(), 15);
    assert!(ledger.categories.iter().all(|category| category.is_default));
    // Preset ids stay valid for new records.
    TransactionService::add(&mut ledger, expense(5.0, 1, 5)).unwrap();
    assert_eq!(ledger.transactions.len(), 1);
}
