use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountKind};
use crate::domain::budget::Budget;
use crate::domain::category::{Category, CategoryKind};
use crate::domain::common::RecordId;
use crate::domain::diary::DiaryEntry;
use crate::domain::plan::{HolidayBalance, Plan};
use crate::domain::settings::Settings;
use crate::domain::task::Task;
use crate::domain::transaction::Transaction;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

const DEFAULT_EXPENSE_CATEGORIES: [(&str, &str, &str); 10] = [
    ("Food & Dining", "UtensilsCrossed", "#FF6B6B"),
    ("Transportation", "Car", "#4ECDC4"),
    ("Shopping", "ShoppingBag", "#95E1D3"),
    ("Entertainment", "Film", "#F38181"),
    ("Bills & Utilities", "Receipt", "#AA96DA"),
    ("Healthcare", "Heart", "#FCBAD3"),
    ("Education", "GraduationCap", "#A8D8EA"),
    ("Travel", "Plane", "#FFD93D"),
    ("Fitness", "Dumbbell", "#6BCB77"),
    ("Other", "MoreHorizontal", "#95A5A6"),
];

const DEFAULT_INCOME_CATEGORIES: [(&str, &str, &str); 5] = [
    ("Salary", "Briefcase", "#2ECC71"),
    ("Freelance", "Laptop", "#3498DB"),
    ("Investment", "TrendingUp", "#9B59B6"),
    ("Gift", "Gift", "#E74C3C"),
    ("Other Income", "DollarSign", "#1ABC9C"),
];

const DEFAULT_ACCOUNTS: [(&str, AccountKind, &str, &str); 3] = [
    ("Cash", AccountKind::Cash, "Wallet", "#10b981"),
    ("Bank Account", AccountKind::Bank, "Building2", "#3b82f6"),
    ("Credit Card", AccountKind::CreditCard, "CreditCard", "#8b5cf6"),
];

/// Per-collection id counters. Counters only grow, so removed records never
/// free their ids for reuse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IdCounters {
    transactions: i64,
    categories: i64,
    accounts: i64,
    budgets: i64,
    tasks: i64,
    plans: i64,
    holiday_balances: i64,
    diary: i64,
}

fn bump(slot: &mut i64) -> RecordId {
    *slot += 1;
    RecordId(*slot)
}

/// Aggregate root holding every record collection of one daybook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub name: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub holiday_balances: Vec<HolidayBalance>,
    #[serde(default)]
    pub diary: Vec<DiaryEntry>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    counters: IdCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            transactions: Vec::new(),
            categories: Vec::new(),
            accounts: Vec::new(),
            budgets: Vec::new(),
            tasks: Vec::new(),
            plans: Vec::new(),
            holiday_balances: Vec::new(),
            diary: Vec::new(),
            settings: Settings::default(),
            counters: IdCounters::default(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Fresh ledger seeded with the built-in categories and accounts.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        let mut ledger = Self::new(name);
        for (name, icon, color) in DEFAULT_EXPENSE_CATEGORIES {
            ledger.add_category(
                Category::new(name, CategoryKind::Expense)
                    .with_icon(icon)
                    .with_color(color)
                    .preset(),
            );
        }
        for (name, icon, color) in DEFAULT_INCOME_CATEGORIES {
            ledger.add_category(
                Category::new(name, CategoryKind::Income)
                    .with_icon(icon)
                    .with_color(color)
                    .preset(),
            );
        }
        for (name, kind, icon, color) in DEFAULT_ACCOUNTS {
            ledger.add_account(Account::new(name, kind).with_icon(icon).with_color(color).preset());
        }
        ledger
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub(crate) fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn add_transaction(&mut self, mut transaction: Transaction) -> RecordId {
        let id = bump(&mut self.counters.transactions);
        transaction.id = id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn add_category(&mut self, mut category: Category) -> RecordId {
        let id = bump(&mut self.counters.categories);
        category.id = id;
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn add_account(&mut self, mut account: Account) -> RecordId {
        let id = bump(&mut self.counters.accounts);
        account.id = id;
        self.accounts.push(account);
        self.touch();
        id
    }

    pub fn add_budget(&mut self, mut budget: Budget) -> RecordId {
        let id = bump(&mut self.counters.budgets);
        budget.id = id;
        self.budgets.push(budget);
        self.touch();
        id
    }

    pub fn add_task(&mut self, mut task: Task) -> RecordId {
        let id = bump(&mut self.counters.tasks);
        task.id = id;
        self.tasks.push(task);
        self.touch();
        id
    }

    pub fn add_plan(&mut self, mut plan: Plan) -> RecordId {
        let id = bump(&mut self.counters.plans);
        plan.id = id;
        self.plans.push(plan);
        self.touch();
        id
    }

    pub fn add_holiday_balance(&mut self, mut balance: HolidayBalance) -> RecordId {
        let id = bump(&mut self.counters.holiday_balances);
        balance.id = id;
        self.holiday_balances.push(balance);
        self.touch();
        id
    }

    pub fn add_diary_entry(&mut self, mut entry: DiaryEntry) -> RecordId {
        let id = bump(&mut self.counters.diary);
        entry.id = id;
        self.diary.push(entry);
        self.touch();
        id
    }

    pub fn transaction(&self, id: RecordId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: RecordId) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn category(&self, id: RecordId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: RecordId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    /// Exact name match, optionally narrowed to one side.
    pub fn category_by_name(&self, name: &str, kind: Option<CategoryKind>) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.name == name && kind.map_or(true, |k| category.kind == k))
    }

    pub fn account(&self, id: RecordId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_mut(&mut self, id: RecordId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    pub fn budget(&self, id: RecordId) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn budget_mut(&mut self, id: RecordId) -> Option<&mut Budget> {
        self.budgets.iter_mut().find(|budget| budget.id == id)
    }

    pub fn task(&self, id: RecordId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn task_mut(&mut self, id: RecordId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn plan(&self, id: RecordId) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == id)
    }

    pub fn plan_mut(&mut self, id: RecordId) -> Option<&mut Plan> {
        self.plans.iter_mut().find(|plan| plan.id == id)
    }

    pub fn holiday_balance(&self, year: i32) -> Option<&HolidayBalance> {
        self.holiday_balances.iter().find(|hb| hb.year == year)
    }

    pub fn holiday_balance_mut(&mut self, year: i32) -> Option<&mut HolidayBalance> {
        self.holiday_balances.iter_mut().find(|hb| hb.year == year)
    }

    pub fn diary_entry(&self, id: RecordId) -> Option<&DiaryEntry> {
        self.diary.iter().find(|entry| entry.id == id)
    }

    pub fn diary_entry_mut(&mut self, id: RecordId) -> Option<&mut DiaryEntry> {
        self.diary.iter_mut().find(|entry| entry.id == id)
    }

    pub fn remove_transaction(&mut self, id: RecordId) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_category(&mut self, id: RecordId) -> Option<Category> {
        let index = self.categories.iter().position(|c| c.id == id)?;
        let removed = self.categories.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_account(&mut self, id: RecordId) -> Option<Account> {
        let index = self.accounts.iter().position(|a| a.id == id)?;
        let removed = self.accounts.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_budget(&mut self, id: RecordId) -> Option<Budget> {
        let index = self.budgets.iter().position(|b| b.id == id)?;
        let removed = self.budgets.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_task(&mut self, id: RecordId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_plan(&mut self, id: RecordId) -> Option<Plan> {
        let index = self.plans.iter().position(|p| p.id == id)?;
        let removed = self.plans.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn remove_diary_entry(&mut self, id: RecordId) -> Option<DiaryEntry> {
        let index = self.diary.iter().position(|e| e.id == id)?;
        let removed = self.diary.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn update_settings(&mut self, mutate: impl FnOnce(&mut Settings)) {
        mutate(&mut self.settings);
        self.touch();
    }

    /// Wipes transactions, budgets, and custom categories. Preset categories,
    /// accounts, tasks, plans, and diary entries survive.
    pub fn clear_data(&mut self) {
        self.transactions.clear();
        self.budgets.clear();
        self.categories.retain(|category| category.is_default);
        self.touch();
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_seed_categories_and_accounts() {
        let ledger = Ledger::with_defaults("Personal");
        assert_eq!(ledger.categories.len(), 15);
        assert_eq!(ledger.accounts.len(), 3);
        assert!(ledger.categories.iter().all(|c| c.is_default));
        assert_eq!(
            ledger
                .categories
                .iter()
                .filter(|c| c.kind == CategoryKind::Expense)
                .count(),
            10
        );
    }

    #[test]
    fn ids_start_at_one_per_collection() {
        let ledger = Ledger::with_defaults("Personal");
        assert_eq!(ledger.categories[0].id, RecordId(1));
        assert_eq!(ledger.categories[0].name, "Food & Dining");
        assert_eq!(ledger.accounts[0].id, RecordId(1));
        assert_eq!(ledger.accounts[0].name, "Cash");
        assert_eq!(ledger.categories[14].id, RecordId(15));
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut ledger = Ledger::new("Test");
        let first = ledger.add_task(Task::new("one"));
        ledger.remove_task(first);
        let second = ledger.add_task(Task::new("two"));
        assert_eq!(second, RecordId(2));
    }

    #[test]
    fn clear_data_keeps_presets() {
        let mut ledger = Ledger::with_defaults("Personal");
        ledger.add_category(Category::new("Hobby", CategoryKind::Expense));
        ledger.add_transaction(Transaction::new(
            crate::domain::transaction::TransactionKind::Expense,
            10.0,
            RecordId(1),
            RecordId(1),
            chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        ));
        ledger.clear_data();
        assert!(ledger.transactions.is_empty());
        assert_eq!(ledger.categories.len(), 15);
        assert_eq!(ledger.accounts.len(), 3);
    }
}
