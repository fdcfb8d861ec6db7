use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::domain::budget::Budget;
use crate::domain::category::Category;
use crate::domain::common::RecordId;
use crate::domain::reporting::{
    month_start_back, BudgetProgress, CategoryTotal, DateWindow, FlowTotals, MonthlyFlow,
    PeriodKind,
};
use crate::domain::transaction::{Transaction, TransactionKind};

/// Read-only aggregations over transaction slices. All functions are pure;
/// callers pass the reference date instead of the service reading a clock.
pub struct ReportService;

impl ReportService {
    pub fn by_date_range<'a>(
        transactions: &'a [Transaction],
        window: &DateWindow,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|txn| window.contains(txn.date))
            .collect()
    }

    pub fn by_kind(transactions: &[Transaction], kind: TransactionKind) -> Vec<&Transaction> {
        transactions.iter().filter(|txn| txn.kind == kind).collect()
    }

    pub fn by_category(transactions: &[Transaction], category_id: RecordId) -> Vec<&Transaction> {
        transactions
            .iter()
            .filter(|txn| txn.category_id == category_id)
            .collect()
    }

    /// Sum of amounts, optionally narrowed to one kind. With no kind every
    /// record counts, transfers included.
    pub fn sum_amounts(transactions: &[Transaction], kind: Option<TransactionKind>) -> f64 {
        transactions
            .iter()
            .filter(|txn| kind.map_or(true, |k| txn.kind == k))
            .map(|txn| txn.amount)
            .sum()
    }

    /// Income and expense totals for the window containing `reference`.
    pub fn period_totals(
        transactions: &[Transaction],
        period: PeriodKind,
        reference: NaiveDate,
    ) -> FlowTotals {
        Self::window_totals(transactions, &period.resolve(reference))
    }

    pub fn window_totals(transactions: &[Transaction], window: &DateWindow) -> FlowTotals {
        let mut income = 0.0;
        let mut expense = 0.0;
        for txn in transactions.iter().filter(|txn| window.contains(txn.date)) {
            match txn.kind {
                TransactionKind::Income => income += txn.amount,
                TransactionKind::Expense => expense += txn.amount,
                TransactionKind::Transfer => {}
            }
        }
        FlowTotals::from_parts(income, expense)
    }

    /// Per-category totals with each category's share of the grand total.
    ///
    /// A transaction contributes to a category only when both the id and the
    /// flow side match, so records under a category of the wrong kind drop
    /// out of every row yet still inflate the grand total the percentages are
    /// computed against. Zero-total categories are omitted; the rest sort by
    /// total, largest first.
    pub fn category_breakdown(
        transactions: &[Transaction],
        categories: &[Category],
    ) -> Vec<CategoryTotal> {
        let grand_total = Self::sum_amounts(transactions, None);
        let mut entries: Vec<CategoryTotal> = categories
            .iter()
            .map(|category| {
                let total: f64 = transactions
                    .iter()
                    .filter(|txn| {
                        txn.category_id == category.id && category.kind.matches(txn.kind)
                    })
                    .map(|txn| txn.amount)
                    .sum();
                let percentage = if grand_total > 0.0 {
                    (total / grand_total) * 100.0
                } else {
                    0.0
                };
                CategoryTotal {
                    category: category.clone(),
                    total,
                    percentage,
                }
            })
            .collect();
        entries.retain(|entry| entry.total > 0.0);
        entries.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
        entries
    }

    /// Spending against the window anchored at the budget's start date.
    pub fn budget_progress(budget: &Budget, transactions: &[Transaction]) -> BudgetProgress {
        Self::progress_in_window(budget, transactions, &budget.window())
    }

    /// Spending against the budget period containing `reference`.
    pub fn budget_progress_at(
        budget: &Budget,
        transactions: &[Transaction],
        reference: NaiveDate,
    ) -> BudgetProgress {
        Self::progress_in_window(budget, transactions, &budget.window_containing(reference))
    }

    fn progress_in_window(
        budget: &Budget,
        transactions: &[Transaction],
        window: &DateWindow,
    ) -> BudgetProgress {
        let spent: f64 = transactions
            .iter()
            .filter(|txn| {
                window.contains(txn.date)
                    && txn.category_id == budget.category_id
                    && txn.kind == TransactionKind::Expense
            })
            .map(|txn| txn.amount)
            .sum();
        BudgetProgress::from_parts(budget.amount, spent)
    }

    /// Month-by-month totals for the `month_count` calendar months ending with
    /// the month containing `today`, oldest first.
    pub fn monthly_trend(
        transactions: &[Transaction],
        month_count: u32,
        today: NaiveDate,
    ) -> Vec<MonthlyFlow> {
        let mut series = Vec::with_capacity(month_count as usize);
        for offset in (0..month_count).rev() {
            let month = month_start_back(today, offset);
            let window = PeriodKind::Month.resolve(month);
            let mut income = 0.0;
            let mut expense = 0.0;
            for txn in transactions.iter().filter(|txn| window.contains(txn.date)) {
                match txn.kind {
                    TransactionKind::Income => income += txn.amount,
                    TransactionKind::Expense => expense += txn.amount,
                    TransactionKind::Transfer => {}
                }
            }
            series.push(MonthlyFlow {
                month,
                label: month.format("%b %Y").to_string(),
                income,
                expense,
            });
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(kind: TransactionKind, amount: f64, category: i64, day: NaiveDate) -> Transaction {
        Transaction::new(kind, amount, RecordId(category), RecordId(1), day)
    }

    #[test]
    fn sum_without_kind_includes_transfers() {
        let txns = vec![
            txn(TransactionKind::Income, 100.0, 11, date(2024, 3, 1)),
            txn(TransactionKind::Expense, 40.0, 1, date(2024, 3, 2)),
            txn(TransactionKind::Transfer, 25.0, 0, date(2024, 3, 3)),
        ];
        assert_eq!(ReportService::sum_amounts(&txns, None), 165.0);
        assert_eq!(
            ReportService::sum_amounts(&txns, Some(TransactionKind::Expense)),
            40.0
        );
    }

    #[test]
    fn window_totals_skip_transfers() {
        let txns = vec![
            txn(TransactionKind::Income, 100.0, 11, date(2024, 3, 1)),
            txn(TransactionKind::Expense, 40.0, 1, date(2024, 3, 2)),
            txn(TransactionKind::Transfer, 25.0, 0, date(2024, 3, 3)),
            txn(TransactionKind::Expense, 99.0, 1, date(2024, 4, 1)),
        ];
        let window = PeriodKind::Month.resolve(date(2024, 3, 15));
        let totals = ReportService::window_totals(&txns, &window);
        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 40.0);
        assert_eq!(totals.balance, 60.0);
    }

    #[test]
    fn trend_is_oldest_first_and_ends_today() {
        let txns = vec![txn(TransactionKind::Expense, 10.0, 1, date(2024, 6, 2))];
        let series = ReportService::monthly_trend(&txns, 3, date(2024, 6, 15));
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].label, "Apr 2024");
        assert_eq!(series[2].label, "Jun 2024");
        assert_eq!(series[2].expense, 10.0);
        assert_eq!(series[0].expense, 0.0);
    }

    #[test]
    fn filters_are_inclusive_of_window_edges() {
        let txns = vec![
            txn(TransactionKind::Expense, 1.0, 1, date(2024, 3, 1)),
            txn(TransactionKind::Expense, 2.0, 1, date(2024, 3, 31)),
            txn(TransactionKind::Expense, 4.0, 1, date(2024, 4, 1)),
        ];
        let window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        let scoped = ReportService::by_date_range(&txns, &window);
        assert_eq!(scoped.len(), 2);
    }
}
