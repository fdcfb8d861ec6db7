use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Identifiable, RecordId};
use crate::domain::reporting::{DateWindow, PeriodKind};
use crate::domain::transaction::Frequency;

/// Default alert threshold, in percent of the budgeted amount.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 80.0;

/// Repeat cadence of a spending budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl Default for BudgetPeriod {
    fn default() -> Self {
        BudgetPeriod::Monthly
    }
}

impl BudgetPeriod {
    pub fn period_kind(self) -> PeriodKind {
        match self {
            BudgetPeriod::Weekly => PeriodKind::Week,
            BudgetPeriod::Monthly => PeriodKind::Month,
            BudgetPeriod::Yearly => PeriodKind::Year,
        }
    }

    fn frequency(self) -> Frequency {
        match self {
            BudgetPeriod::Weekly => Frequency::Weekly,
            BudgetPeriod::Monthly => Frequency::Monthly,
            BudgetPeriod::Yearly => Frequency::Yearly,
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Some(BudgetPeriod::Weekly),
            "monthly" | "month" => Some(BudgetPeriod::Monthly),
            "yearly" | "year" => Some(BudgetPeriod::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        };
        write!(f, "{label}")
    }
}

/// Spending limit for one expense category over a repeating period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: RecordId,
    pub category_id: RecordId,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub currency: String,
    #[serde(default = "Budget::alert_threshold_default")]
    pub alert_threshold: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(
        category_id: RecordId,
        amount: f64,
        period: BudgetPeriod,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::default(),
            category_id,
            amount,
            period,
            start_date,
            currency: "USD".to_string(),
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_alert_threshold(mut self, threshold: f64) -> Self {
        self.alert_threshold = threshold;
        self
    }

    /// Calendar window anchored at the budget's start date. Spending is
    /// tracked against this window, not the period containing today.
    pub fn window(&self) -> DateWindow {
        self.period.period_kind().resolve(self.start_date)
    }

    /// Projects the anchor window forward until it reaches `reference`. When
    /// the anchor lies in the future the anchor window is returned unchanged.
    pub fn window_containing(&self, reference: NaiveDate) -> DateWindow {
        let frequency = self.period.frequency();
        let mut anchor = self.start_date;
        let mut window = self.period.period_kind().resolve(anchor);
        while window.end < reference {
            anchor = frequency.next_date(anchor);
            window = self.period.period_kind().resolve(anchor);
        }
        window
    }

    fn alert_threshold_default() -> f64 {
        DEFAULT_ALERT_THRESHOLD
    }
}

impl Identifiable for Budget {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_follows_the_anchor_month() {
        let budget = Budget::new(RecordId(1), 200.0, BudgetPeriod::Monthly, date(2024, 1, 15));
        let window = budget.window();
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.end, date(2024, 1, 31));
    }

    #[test]
    fn projection_reaches_the_reference_month() {
        let budget = Budget::new(RecordId(1), 200.0, BudgetPeriod::Monthly, date(2024, 1, 15));
        let window = budget.window_containing(date(2024, 4, 3));
        assert_eq!(window.start, date(2024, 4, 1));
        assert_eq!(window.end, date(2024, 4, 30));
    }

    #[test]
    fn projection_keeps_future_anchor() {
        let budget = Budget::new(RecordId(1), 50.0, BudgetPeriod::Weekly, date(2024, 6, 10));
        let window = budget.window_containing(date(2024, 6, 1));
        assert_eq!(window.start, date(2024, 6, 10));
        assert_eq!(window.end, date(2024, 6, 16));
    }

    #[test]
    fn weekly_projection_steps_whole_weeks() {
        let budget = Budget::new(RecordId(1), 50.0, BudgetPeriod::Weekly, date(2024, 6, 5));
        let window = budget.window_containing(date(2024, 6, 20));
        assert_eq!(window.start, date(2024, 6, 17));
        assert_eq!(window.end, date(2024, 6, 23));
    }
}
