use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use daybook_core::core::services::ReportService;
use daybook_core::domain::common::RecordId;
use daybook_core::domain::reporting::DateWindow;
use daybook_core::domain::transaction::{Transaction, TransactionKind};
use daybook_core::ledger::Ledger;

fn build_sample_ledger(txn_count: usize) -> Ledger {
    let mut ledger = Ledger::with_defaults("Benchmark");
    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    for idx in 0..txn_count {
        let date = start_date + Duration::days((idx % 365) as i64);
        let txn = if idx % 5 == 0 {
            Transaction::new(
                TransactionKind::Income,
                1500.0 + (idx % 7) as f64 * 100.0,
                RecordId(11 + (idx % 5) as i64),
                RecordId(1),
                date,
            )
        } else {
            Transaction::new(
                TransactionKind::Expense,
                20.0 + (idx % 90) as f64,
                RecordId(1 + (idx % 10) as i64),
                RecordId(1 + (idx % 3) as i64),
                date,
            )
        };
        ledger.add_transaction(txn);
    }
    ledger
}

fn bench_aggregations(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let window = DateWindow::new(
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
    )
    .expect("window");
    let reference = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();

    c.bench_function("window_totals_10k", |b| {
        b.iter(|| {
            let totals = ReportService::window_totals(&ledger.transactions, &window);
            black_box(totals);
        })
    });

    c.bench_function("category_breakdown_10k", |b| {
        b.iter(|| {
            let rows = ReportService::category_breakdown(&ledger.transactions, &ledger.categories);
            black_box(rows);
        })
    });

    c.bench_function("monthly_trend_12m_10k", |b| {
        b.iter(|| {
            let series = ReportService::monthly_trend(&ledger.transactions, 12, reference);
            black_box(series);
        })
    });
}

criterion_group!(benches, bench_aggregations);
criterion_main!(benches);
