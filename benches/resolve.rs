//! Performance benchmarks for schema resolution.
//!
//! Measures single-variable parsing, a flat schema, and a nested schema
//! with union alternatives, for both passing and failing data.

use criterion::{criterion_group, criterion_main, Criterion};
use configvar::prelude::*;
use std::hint::black_box;

fn flat_schema(fields: usize) -> Schema {
    (0..fields)
        .fold(Group::new(), |group, i| {
            group.field(format!("field_{i}"), integer().min(0.0).from(format!("FIELD_{i}")))
        })
        .into()
}

fn flat_data(fields: usize) -> Data {
    (0..fields).map(|i| (format!("FIELD_{i}"), i.to_string())).collect()
}

fn nested_schema() -> Schema {
    Group::new()
        .field(
            "server",
            Group::new()
                .field("host", string().from("HOST").default_to("0.0.0.0"))
                .field("port", integer().min(1.0).max(65535.0).from("PORT"))
                .field("debug", boolean().from("DEBUG").default_to(false)),
        )
        .field(
            "database",
            Schema::union([
                Group::new().field("url", string().url().from("DATABASE_URL")),
                Group::new()
                    .field("host", string().from("DB_HOST"))
                    .field("port", integer().from("DB_PORT")),
            ]),
        )
        .field("started", date().optional().from("STARTED"))
        .field("level", enumeration(["error", "warn", "info"]).insensitive().from("LEVEL"))
        .into()
}

fn bench_variable_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("variable_parse");
    let int = integer().min(0.0);
    let either = boolean().map(|b| if b { 1i64 } else { 0 }).or(&integer());
    let when = date();

    group.bench_function("integer_hex", |b| b.iter(|| int.parse(black_box(Some("0x1F90")))));
    group.bench_function("union_fallthrough", |b| {
        b.iter(|| either.parse(black_box(Some("42"))))
    });
    group.bench_function("date_iso", |b| {
        b.iter(|| when.parse(black_box(Some("2024-02-29T12:30:00.250+02:00"))))
    });
    group.finish();
}

fn bench_flat_schema(c: &mut Criterion) {
    let schema = flat_schema(50);
    let data = flat_data(50);
    let empty = Data::new();

    let mut group = c.benchmark_group("flat_schema_50");
    group.bench_function("valid", |b| {
        b.iter(|| parse_values(black_box(&schema), black_box(&data)))
    });
    group.bench_function("all_missing", |b| {
        b.iter(|| parse_values(black_box(&schema), black_box(&empty)))
    });
    group.bench_function("results", |b| {
        b.iter(|| parse_results(black_box(&schema), black_box(&data)))
    });
    group.finish();
}

fn bench_nested_schema(c: &mut Criterion) {
    let schema = nested_schema();
    let first_alternative = Data::new()
        .with("PORT", "8080")
        .with("DATABASE_URL", "postgres://db/app")
        .with("STARTED", "2024-01-01")
        .with("LEVEL", "INFO");
    let second_alternative = Data::new()
        .with("PORT", "8080")
        .with("DB_HOST", "db")
        .with("DB_PORT", "5432")
        .with("LEVEL", "warn");

    let mut group = c.benchmark_group("nested_schema");
    group.bench_function("union_first", |b| {
        b.iter(|| parse_values(black_box(&schema), black_box(&first_alternative)))
    });
    group.bench_function("union_second", |b| {
        b.iter(|| parse_values(black_box(&schema), black_box(&second_alternative)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_variable_parse,
    bench_flat_schema,
    bench_nested_schema
);
criterion_main!(benches);
