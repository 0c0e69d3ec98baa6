//! Criterion benchmarks for the builder hot paths.
//!
//! Benchmarks:
//! 1. Output catalog derivation over growing indicator sets
//! 2. Indicator removal (re-derivation plus reconciliation of both lists)
//! 3. Full specification compile

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use eaforge_core::{
    derive_catalog, ConditionField, IndicatorKind, IndicatorSet, ListKind, StrategyBuilder,
    ValueKind,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_set(n: usize) -> IndicatorSet {
    let mut set = IndicatorSet::new();
    for i in 0..n {
        set.add(IndicatorKind::ALL[i % IndicatorKind::ALL.len()]);
    }
    set
}

/// A builder with `n` indicators and `n` rows per list, every row
/// referencing catalog outputs.
fn make_builder(n: usize) -> StrategyBuilder {
    let mut b = StrategyBuilder::default();
    for i in 0..n {
        b.add_indicator(IndicatorKind::ALL[i % IndicatorKind::ALL.len()]);
    }
    let ids: Vec<String> = b.catalog().ids().iter().map(|s| s.to_string()).collect();
    for list in [ListKind::Entry, ListKind::Exit] {
        for i in 0..n {
            let index = b.add_condition(list, None);
            let subject = ids[i % ids.len()].clone();
            let value = ids[(i + 1) % ids.len()].clone();
            let _ = b.set_condition_field(list, index, ConditionField::Subject(subject));
            let _ = b.set_condition_field(list, index, ConditionField::ValueKind(ValueKind::Output));
            let _ = b.set_condition_field(list, index, ConditionField::ValueRef(value));
        }
    }
    b
}

// ── 1. Catalog derivation ────────────────────────────────────────────

fn bench_derive_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_catalog");

    for &count in &[6, 60, 600] {
        let set = make_set(count);
        group.bench_with_input(BenchmarkId::new("mixed_kinds", count), &count, |b, _| {
            b.iter(|| derive_catalog(black_box(&set)));
        });
    }

    group.finish();
}

// ── 2. Removal with reconciliation ───────────────────────────────────

fn bench_remove_indicator(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_indicator");

    for &count in &[6, 60, 300] {
        let builder = make_builder(count);
        group.bench_with_input(BenchmarkId::new("remove_first", count), &count, |b, _| {
            b.iter_batched(
                || builder.clone(),
                |mut bld| {
                    bld.remove_indicator(black_box(0));
                    bld
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ── 3. Compile ───────────────────────────────────────────────────────

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_specification");

    for &count in &[6, 60, 300] {
        let builder = make_builder(count);
        group.bench_with_input(BenchmarkId::new("referencing_rows", count), &count, |b, _| {
            b.iter(|| black_box(&builder).compile());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_derive_catalog,
    bench_remove_indicator,
    bench_compile,
);
criterion_main!(benches);
