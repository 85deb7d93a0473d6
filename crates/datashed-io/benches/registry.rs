//! Registry lookup benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use datashed_io::{FormatRegistry, ValueKind};

fn loader_lookup(c: &mut Criterion) {
    let registry = FormatRegistry::with_defaults();
    c.bench_function("loader_lookup_aliased", |b| {
        b.iter(|| registry.loader(black_box(".yml")))
    });
}

fn dumper_specificity(c: &mut Criterion) {
    let registry = FormatRegistry::with_defaults();
    c.bench_function("dumper_ancestor_walk", |b| {
        b.iter(|| registry.dumper(black_box(".json"), black_box(ValueKind::Int)))
    });
}

criterion_group!(benches, loader_lookup, dumper_specificity);
criterion_main!(benches);
