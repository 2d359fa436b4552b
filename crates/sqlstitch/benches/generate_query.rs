use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlstitch::{Dialect, JoinKind, OfflineAdapter, Statement, StatementKind};
use std::sync::Arc;

/// A SELECT with one base table, `n` joins, `n` columns and `n` filter clauses.
fn build_statement(n: usize) -> Statement {
    let mut stmt = Statement::with_adapter(Arc::new(OfflineAdapter::new(Dialect::MySql)));
    stmt.set_type(StatementKind::Select).add_table("base", Some("b"));
    for i in 0..n {
        let alias = format!("j{i}");
        let condition = format!("j{i}.base_id = b.id");
        let column_alias = format!("c{i}");
        stmt.add_join(
            JoinKind::Left,
            &format!("t{i}"),
            Some(alias.as_str()),
            Some(condition.as_str()),
        )
        .add_column(
            &format!("j{i}.col"),
            Some(column_alias.as_str()),
            i as i64,
            None,
        )
        .add_where(&format!("j{i}.flag = :c{i}"));
    }
    stmt.add_sort("b.id", None).set_page_number(3).set_page_size(25);
    stmt
}

fn bench_generate_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement/generate_query");

    for n in [1, 5, 10, 50] {
        let stmt = build_statement(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.generate_query()));
        });
    }

    group.finish();
}

fn bench_raw_template(c: &mut Criterion) {
    let mut stmt = build_statement(10);
    stmt.set_template(
        "SELECT * FROM base b WHERE b.active = 1 {{where|AND}} ORDER BY b.id {{sort|,}}",
    );

    c.bench_function("statement/raw_template", |b| {
        b.iter(|| black_box(stmt.generate_query()));
    });
}

criterion_group!(benches, bench_generate_query, bench_raw_template);
criterion_main!(benches);
