//! Free-text command interpretation: classifies a sentence into an intent and
//! extracts a typed draft ready to insert through the services.
//!
//! Classification checks intent families in a fixed order (task, expense,
//! income, diary, budget) and takes the first whose keywords appear, so a
//! sentence like "add a task to track my spending" is a task even though it
//! mentions spending.

pub mod keywords;

pub use keywords::{CategoryHint, KeywordSets, MoodHint};

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::budget::{Budget, BudgetPeriod};
use crate::domain::category::CategoryKind;
use crate::domain::common::RecordId;
use crate::domain::diary::{DiaryEntry, Mood};
use crate::domain::task::{Task, TaskCategory, TaskPriority};
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::ledger::Ledger;

/// Confidence below which a parse is reported but never applied.
pub const CONFIDENCE_FLOOR: f64 = 0.5;

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:rupees|rs|dollars|\$)").unwrap());

static TASK_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)task is to (.+?)(?:\s+with|\s+deadline|\s+priority|$)").unwrap());

/// Fallback targets used when free text cannot be matched to stored records.
#[derive(Debug, Clone)]
pub struct QuickAddDefaults {
    pub account_id: RecordId,
    pub category_id: RecordId,
    pub currency: String,
}

impl Default for QuickAddDefaults {
    fn default() -> Self {
        Self {
            account_id: RecordId(1),
            category_id: RecordId(1),
            currency: "INR".to_string(),
        }
    }
}

/// Outcome of interpreting one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub intent: Intent,
    pub confidence: f64,
}

impl ParsedCommand {
    /// Only confident, classified parses may be applied to the ledger.
    pub fn is_actionable(&self) -> bool {
        self.confidence >= CONFIDENCE_FLOOR && !matches!(self.intent, Intent::Unknown)
    }

    fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Task(TaskDraft),
    Expense(TransactionDraft),
    Income(TransactionDraft),
    Diary(DiaryDraft),
    Budget(BudgetDraft),
    Unknown,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Task(_) => "task",
            Intent::Expense(_) => "expense",
            Intent::Income(_) => "income",
            Intent::Diary(_) => "diary",
            Intent::Budget(_) => "budget",
            Intent::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub category: TaskCategory,
}

impl TaskDraft {
    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.title)
            .with_category(self.category)
            .with_priority(self.priority);
        if let Some(due) = self.due_date {
            task = task.with_due_date(due);
        }
        task
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: f64,
    pub category_id: RecordId,
    pub account_id: RecordId,
    pub description: String,
    pub date: NaiveDate,
    pub currency: String,
}

impl TransactionDraft {
    pub fn into_transaction(self) -> Transaction {
        Transaction::new(
            self.kind,
            self.amount,
            self.category_id,
            self.account_id,
            self.date,
        )
        .with_description(self.description)
        .with_currency(self.currency)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiaryDraft {
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub date: NaiveDate,
}

impl DiaryDraft {
    pub fn into_entry(self) -> DiaryEntry {
        DiaryEntry::new(self.date, self.title, self.content, self.mood)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDraft {
    pub category_id: RecordId,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
}

impl BudgetDraft {
    pub fn into_budget(self) -> Budget {
        Budget::new(self.category_id, self.amount, self.period, self.start_date)
    }
}

/// Turns free text into typed drafts using keyword tables and the ledger's
/// categories.
pub struct Interpreter {
    keywords: KeywordSets,
    defaults: QuickAddDefaults,
}

impl Interpreter {
    pub fn new(defaults: QuickAddDefaults) -> Self {
        Self::with_keywords(KeywordSets::default(), defaults)
    }

    pub fn with_keywords(keywords: KeywordSets, defaults: QuickAddDefaults) -> Self {
        Self { keywords, defaults }
    }

    pub fn interpret(&self, text: &str, ledger: &Ledger, today: NaiveDate) -> ParsedCommand {
        let lower = text.to_lowercase();
        if contains_any(&lower, &self.keywords.task) {
            return self.parse_task(text, &lower, today);
        }
        if contains_any(&lower, &self.keywords.expense) {
            return self.parse_flow(TransactionKind::Expense, text, &lower, ledger, today);
        }
        if contains_any(&lower, &self.keywords.income) {
            return self.parse_flow(TransactionKind::Income, text, &lower, ledger, today);
        }
        if contains_any(&lower, &self.keywords.diary) {
            return self.parse_diary(text, &lower, today);
        }
        if contains_any(&lower, &self.keywords.budget) {
            return self.parse_budget(text, &lower, ledger, today);
        }
        ParsedCommand::unknown()
    }

    fn parse_task(&self, text: &str, lower: &str, today: NaiveDate) -> ParsedCommand {
        let title = TASK_TITLE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| text.to_string());

        let priority = if contains_any(lower, &self.keywords.priority_high) {
            TaskPriority::High
        } else if contains_any(lower, &self.keywords.priority_low) {
            TaskPriority::Low
        } else {
            TaskPriority::Medium
        };

        let due_date = if lower.contains("today") {
            Some(today)
        } else if lower.contains("tomorrow") {
            Some(today + Duration::days(1))
        } else if lower.contains("next week") {
            Some(today + Duration::days(7))
        } else {
            None
        };

        ParsedCommand {
            intent: Intent::Task(TaskDraft {
                title,
                priority,
                due_date,
                category: TaskCategory::Work,
            }),
            confidence: 0.9,
        }
    }

    fn parse_flow(
        &self,
        kind: TransactionKind,
        text: &str,
        lower: &str,
        ledger: &Ledger,
        today: NaiveDate,
    ) -> ParsedCommand {
        let amount = extract_amount(text);
        let (hints, fallback, side) = match kind {
            TransactionKind::Income => (
                &self.keywords.income_hints,
                self.keywords.income_fallback.as_str(),
                CategoryKind::Income,
            ),
            _ => (
                &self.keywords.expense_hints,
                self.keywords.expense_fallback.as_str(),
                CategoryKind::Expense,
            ),
        };
        let name = hint_category(lower, hints, fallback);
        let category_id = ledger
            .category_by_name(name, Some(side))
            .or_else(|| ledger.categories.iter().find(|c| c.kind == side))
            .map(|category| category.id)
            .unwrap_or(self.defaults.category_id);

        let confidence = if amount > 0.0 { 0.9 } else { 0.5 };
        let draft = TransactionDraft {
            kind,
            amount,
            category_id,
            account_id: self.defaults.account_id,
            description: text.to_string(),
            date: today,
            currency: self.defaults.currency.clone(),
        };
        let intent = match kind {
            TransactionKind::Income => Intent::Income(draft),
            _ => Intent::Expense(draft),
        };
        ParsedCommand { intent, confidence }
    }

    fn parse_diary(&self, text: &str, lower: &str, today: NaiveDate) -> ParsedCommand {
        let mood = self
            .keywords
            .mood_hints
            .iter()
            .find(|hint| contains_any(lower, &hint.keywords))
            .map(|hint| hint.mood)
            .unwrap_or(Mood::Okay);

        let leading = text
            .split_whitespace()
            .take(5)
            .collect::<Vec<_>>()
            .join(" ");
        let title = if leading.chars().count() > 30 {
            let cut: String = leading.chars().take(30).collect();
            format!("{cut}...")
        } else {
            leading
        };

        ParsedCommand {
            intent: Intent::Diary(DiaryDraft {
                title,
                content: text.to_string(),
                mood,
                date: today,
            }),
            confidence: 0.8,
        }
    }

    fn parse_budget(
        &self,
        text: &str,
        lower: &str,
        ledger: &Ledger,
        today: NaiveDate,
    ) -> ParsedCommand {
        let amount = extract_amount(text);
        let name = hint_category(
            lower,
            &self.keywords.budget_hints,
            &self.keywords.budget_fallback,
        );
        // Budget hints match by name alone; a failed lookup falls back to the
        // first stored category.
        let category_id = ledger
            .category_by_name(name, None)
            .or_else(|| ledger.categories.first())
            .map(|category| category.id)
            .unwrap_or(self.defaults.category_id);

        ParsedCommand {
            intent: Intent::Budget(BudgetDraft {
                category_id,
                amount,
                period: BudgetPeriod::Monthly,
                start_date: today,
            }),
            confidence: if amount > 0.0 { 0.8 } else { 0.4 },
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

fn hint_category<'a>(lower: &str, hints: &'a [CategoryHint], fallback: &'a str) -> &'a str {
    hints
        .iter()
        .find(|hint| contains_any(lower, &hint.keywords))
        .map(|hint| hint.category.as_str())
        .unwrap_or(fallback)
}

fn extract_amount(text: &str) -> f64 {
    AMOUNT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn interpreter() -> Interpreter {
        Interpreter::new(QuickAddDefaults::default())
    }

    #[test]
    fn amount_units_are_interchangeable() {
        assert_eq!(extract_amount("spent 100 rupees"), 100.0);
        assert_eq!(extract_amount("spent 250rs today"), 250.0);
        assert_eq!(extract_amount("paid 42 dollars"), 42.0);
        assert_eq!(extract_amount("paid 42 $"), 42.0);
        assert_eq!(extract_amount("spent nothing"), 0.0);
    }

    #[test]
    fn task_keywords_win_over_expense_keywords() {
        let ledger = Ledger::with_defaults("Test");
        let parsed = interpreter().interpret(
            "add a task to track what I spent",
            &ledger,
            today(),
        );
        assert!(matches!(parsed.intent, Intent::Task(_)));
    }

    #[test]
    fn expense_keywords_win_over_income_keywords() {
        let ledger = Ledger::with_defaults("Test");
        let parsed = interpreter().interpret(
            "I spent 50 dollars of my salary",
            &ledger,
            today(),
        );
        assert!(matches!(parsed.intent, Intent::Expense(_)));
    }

    #[test]
    fn empty_text_is_unknown() {
        let ledger = Ledger::with_defaults("Test");
        let parsed = interpreter().interpret("", &ledger, today());
        assert_eq!(parsed.intent, Intent::Unknown);
        assert_eq!(parsed.confidence, 0.0);
        assert!(!parsed.is_actionable());
    }

    #[test]
    fn diary_titles_truncate_at_thirty_chars() {
        let ledger = Ledger::with_defaults("Test");
        let parsed = interpreter().interpret(
            "I feel exceptionally enthusiastic regarding everything currently happening",
            &ledger,
            today(),
        );
        match parsed.intent {
            Intent::Diary(draft) => {
                assert!(draft.title.ends_with("..."));
                assert_eq!(draft.title.chars().count(), 33);
            }
            other => panic!("expected diary, got {other:?}"),
        }
    }

    #[test]
    fn first_mood_hint_wins() {
        let ledger = Ledger::with_defaults("Test");
        let parsed =
            interpreter().interpret("I feel good but a bit sad tonight", &ledger, today());
        match parsed.intent {
            Intent::Diary(draft) => assert_eq!(draft.mood, Mood::Good),
            other => panic!("expected diary, got {other:?}"),
        }
    }

    #[test]
    fn amountless_flows_sit_on_the_confidence_floor() {
        let ledger = Ledger::with_defaults("Test");
        let parsed = interpreter().interpret("I spent money on stuff", &ledger, today());
        assert_eq!(parsed.confidence, 0.5);
        assert!(parsed.is_actionable());
    }
}
