use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::errors::StoreError;

/// Calendar period selectable in summaries. Weeks run Monday through Sunday;
/// months and years follow the calendar, not rolling offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Week,
    Month,
    Year,
}

impl PeriodKind {
    /// Resolves the calendar window containing `reference`.
    pub fn resolve(self, reference: NaiveDate) -> DateWindow {
        match self {
            PeriodKind::Week => {
                let offset = reference.weekday().num_days_from_monday() as i64;
                let start = reference - Duration::days(offset);
                DateWindow {
                    start,
                    end: start + Duration::days(6),
                }
            }
            PeriodKind::Month => {
                let start = reference.with_day(1).unwrap();
                DateWindow {
                    start,
                    end: last_day_of_month(reference.year(), reference.month()),
                }
            }
            PeriodKind::Year => DateWindow {
                start: NaiveDate::from_ymd_opt(reference.year(), 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(reference.year(), 12, 31).unwrap(),
            },
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" => Some(PeriodKind::Week),
            "month" | "monthly" => Some(PeriodKind::Month),
            "year" | "yearly" => Some(PeriodKind::Year),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
            PeriodKind::Year => "year",
        };
        write!(f, "{label}")
    }
}

/// Inclusive date range; both endpoints belong to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, StoreError> {
        if end < start {
            return Err(StoreError::InvalidInput(
                "window end must not precede its start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Last calendar day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap() - Duration::days(1)
}

/// First day of the month `offset` months before the month containing
/// `reference`.
pub fn month_start_back(reference: NaiveDate, offset: u32) -> NaiveDate {
    let index = reference.year() * 12 + reference.month() as i32 - 1 - offset as i32;
    let year = index.div_euclid(12);
    let month = (index.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

/// Income and expense totals over one window. Transfers count toward neither
/// side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl FlowTotals {
    pub fn from_parts(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// One category's share of a transaction set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub percentage: f64,
}

/// Spending position of one budget over its tracking window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
    pub over_budget: bool,
}

impl BudgetProgress {
    /// Derives progress from the budgeted amount and the spent total. A zero
    /// or negative budget amount reports zero percent rather than dividing.
    pub fn from_parts(amount: f64, spent: f64) -> Self {
        let percentage = if amount > 0.0 {
            (spent / amount) * 100.0
        } else {
            0.0
        };
        Self {
            spent,
            remaining: amount - spent,
            percentage,
            over_budget: spent > amount,
        }
    }

    pub fn alert_breached(&self, threshold: f64) -> bool {
        self.percentage >= threshold
    }
}

/// One month's totals inside a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    /// First day of the month the entry covers.
    pub month: NaiveDate,
    pub label: String,
    pub income: f64,
    pub expense: f64,
}
