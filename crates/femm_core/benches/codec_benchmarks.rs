//! Criterion benchmarks for the command codec
//!
//! Run with: cargo bench -p femm_core

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use femm_core::protocol::{Arg, Command, decode, encode, parse_literal};

fn bench_encode(c: &mut Criterion) {
    let args = vec![
        Arg::from("Copper"),
        Arg::from(true),
        Arg::from(0.25),
        Arg::from("coil"),
        Arg::from(90.0),
        Arg::from(2),
        Arg::from(None::<i64>),
    ];

    c.bench_function("encode_setblockprop", |b| {
        b.iter(|| encode(black_box("mi_setblockprop"), black_box(&args)))
    });

    c.bench_function("command_builder", |b| {
        b.iter(|| {
            Command::new("mi_addarc")
                .arg(black_box(0.0))
                .arg(black_box(1.0))
                .arg(black_box(0.0))
                .arg(black_box(-1.0))
                .arg(180.0)
                .arg(5.0)
                .to_string()
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let point_values =
        "[0.000123, -4.5e-05, 1.2, 0.0, 3.3, 7.1e-09, 1.0, 1.0, 0.5, 0.0, 0.0, 12.5, 0.25, 0.0]";

    c.bench_function("decode_point_values", |b| {
        b.iter(|| decode(black_box(point_values)))
    });

    c.bench_function("decode_scalar", |b| b.iter(|| decode(black_box("(42.0)"))));

    c.bench_function("parse_nested_literal", |b| {
        b.iter(|| parse_literal(black_box("((1, 2.5), [3, 'a'], (4,))")))
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
