use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable, RecordId};

/// Money flow direction of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
            TransactionKind::Transfer => "transfer",
        };
        write!(f, "{label}")
    }
}

/// Repeat cadence for recurring records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Monthly
    }
}

impl Frequency {
    /// Next occurrence after `from`. Month and year steps clamp the day to the
    /// target month length, so Jan 31 advances to Feb 28 (or 29).
    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => from + Duration::days(1),
            Frequency::Weekly => from + Duration::weeks(1),
            Frequency::Monthly => shift_month(from, 1),
            Frequency::Yearly => shift_month(from, 12),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        write!(f, "{label}")
    }
}

/// Recurrence schedule attached to transactions and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Recurrence {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            end_date: None,
        }
    }

    pub fn until(frequency: Frequency, end_date: NaiveDate) -> Self {
        Self {
            frequency,
            end_date: Some(end_date),
        }
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| date <= end)
    }
}

/// A single money movement: expense, income, or transfer between accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category_id: RecordId,
    pub account_id: RecordId,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub currency: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds an unsaved record; the store assigns the id on insert.
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category_id: RecordId,
        account_id: RecordId,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::default(),
            amount,
            kind,
            category_id,
            account_id,
            date,
            description: String::new(),
            currency: "USD".to_string(),
            tags: Vec::new(),
            receipt: None,
            recurrence: None,
            from_account_id: None,
            to_account_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn is_transfer(&self) -> bool {
        self.kind == TransactionKind::Transfer
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {:.2} {} on {}",
            self.kind, self.amount, self.currency, self.date
        )
    }
}

fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + delta;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let month = month as u32;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 1).unwrap());
    (first_of_next - Duration::days(1)).day()
}
