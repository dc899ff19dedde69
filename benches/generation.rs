use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use recurring_core::engine::Engine;
use recurring_core::journal::{
    next_occurrence, CategorySnapshot, Expense, Frequency, Journal, RecurringExpense,
};
use recurring_core::storage::json_backend::{load_journal_from_path, save_journal_to_path};
use recurring_core::storage::JsonStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

fn build_sample_journal(expense_count: usize) -> Journal {
    let mut journal = Journal::new();
    let pattern = RecurringExpense::new(
        Decimal::new(4250, 2),
        CategorySnapshot::new("Groceries", "cart", "#4CAF50"),
        Frequency::Daily,
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    );
    let start_date = pattern.start_date;
    let pattern_ref = pattern.clone();
    journal.add_pattern(pattern);

    for idx in 0..expense_count {
        let date = start_date + Duration::days(idx as i64);
        journal.add_expense(Expense::from_pattern(&pattern_ref, date));
    }
    journal
}

fn bench_journal_io(c: &mut Criterion) {
    let journal = build_sample_journal(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("journal.json");

    c.bench_function("journal_save_10k", |b| {
        b.iter(|| {
            save_journal_to_path(&journal, &file_path).expect("save journal");
        })
    });

    save_journal_to_path(&journal, &file_path).expect("seed");

    c.bench_function("journal_load_10k", |b| {
        b.iter(|| {
            let loaded = load_journal_from_path(&file_path).expect("load journal");
            black_box(loaded);
        })
    });
}

fn bench_occurrence_walk(c: &mut Criterion) {
    let pattern = RecurringExpense::new(
        Decimal::new(999, 2),
        CategorySnapshot::new("Rent", "home", "#2196F3"),
        Frequency::Monthly { day_of_month: 31 },
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    );

    c.bench_function("next_occurrence_century_walk", |b| {
        b.iter(|| {
            let mut cursor = pattern.start_date - Duration::days(1);
            for _ in 0..1_200 {
                cursor = next_occurrence(&pattern, cursor).expect("open-ended pattern");
            }
            black_box(cursor);
        })
    });
}

fn setup_year_backlog() -> (TempDir, Engine<JsonStore>, NaiveDate) {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::open(Some(dir.path().to_path_buf()), Some(1)).expect("store");
    let engine = Engine::new(Arc::new(store));

    let as_of = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let pattern = RecurringExpense::new(
        Decimal::new(1500, 2),
        CategorySnapshot::new("Streaming", "tv", "#FF6B6B"),
        Frequency::Daily,
        as_of - Duration::days(364),
    );
    engine.create_pattern(pattern).expect("pattern");
    (dir, engine, as_of)
}

fn bench_generation(c: &mut Criterion) {
    c.bench_function("generate_year_backlog", |b| {
        b.iter_batched(
            setup_year_backlog,
            |(_dir, engine, as_of)| {
                let report = engine.generate_due(as_of).expect("generate");
                black_box(report);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_journal_io, bench_occurrence_walk, bench_generation);
criterion_main!(benches);
