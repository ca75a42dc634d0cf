use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use paradox::{vdf, Modulus};

fn bench_evaluate(c: &mut Criterion) {
    let modulus = Modulus::default_2048();
    c.bench_function("vdf_evaluate_t1000", |b| {
        b.iter(|| vdf::evaluate(black_box(&modulus), black_box(1000), black_box(b"bench payload")))
    });
}

fn bench_verify(c: &mut Criterion) {
    let modulus = Modulus::default_2048();
    let (f, pi) = vdf::evaluate(&modulus, 1000, b"bench payload");
    c.bench_function("vdf_verify_t1000", |b| {
        b.iter(|| {
            vdf::verify(
                black_box(&modulus),
                black_box(1000),
                black_box(b"bench payload"),
                black_box(&f),
                black_box(&pi),
            )
        })
    });
}

fn bench_hash_to_prime(c: &mut Criterion) {
    let modulus = Modulus::default_2048();
    let g = vdf::hash_to_group(&modulus, b"g");
    let f = vdf::hash_to_group(&modulus, b"f");
    c.bench_function("vdf_hash_to_prime", |b| {
        b.iter(|| vdf::hash_to_prime(black_box(&modulus), black_box(&g), black_box(42), black_box(&f)))
    });
}

criterion_group!(benches, bench_evaluate, bench_verify, bench_hash_to_prime);
criterion_main!(benches);
