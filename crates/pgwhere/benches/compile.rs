use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgwhere::{Condition, Fields, compile_where, update_sql};
use serde_json::json;

/// `col0 = '0' AND col1 = '1' AND ...`
fn flat_condition(n: usize) -> Condition {
    (0..n).fold(Condition::new(), |c, i| c.eq(format!("col{i}"), i as i64))
}

/// `a = '0' AND (b = '0' OR (a = '1' AND (b = '1' OR ...)))`
fn nested_condition(depth: usize) -> Condition {
    let mut cond = Condition::new();
    for i in (0..depth).rev() {
        let inner = Condition::new().eq("b", i as i64);
        let inner = if cond.is_empty() { inner } else { inner.and(cond) };
        cond = Condition::new().eq("a", i as i64).or(inner);
    }
    cond
}

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/flat");

    for n in [1, 5, 10, 50, 100] {
        let cond = flat_condition(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cond, |b, cond| {
            b.iter(|| black_box(compile_where(cond)));
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/nested");

    for depth in [1, 4, 16, 64] {
        let cond = nested_condition(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &cond, |b, cond| {
            b.iter(|| black_box(compile_where(cond)));
        });
    }

    group.finish();
}

fn bench_parse_and_compile(c: &mut Criterion) {
    let value = json!({
        "status": "active",
        "team": 4,
        "or": {"role": ["admin", "owner", "maintainer"], "and": {"age": 30, "city": "Oslo"}},
        "deleted_at": null
    });

    c.bench_function("compile/parse_and_compile", |b| {
        b.iter(|| {
            let cond = Condition::from_json(black_box(&value)).unwrap();
            black_box(compile_where(&cond))
        });
    });
}

fn bench_update_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/update_sql");

    for n in [1, 10, 50] {
        let values = (0..n)
            .map(|i| (format!("col{i}"), format!("it's {i}")))
            .collect::<Fields>()
            .to_condition();
        let cond = flat_condition(3);
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| black_box(update_sql("users", values, &cond)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_flat,
    bench_nested,
    bench_parse_and_compile,
    bench_update_sql
);
criterion_main!(benches);
