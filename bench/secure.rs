use std::thread;

use aggtree::{
    accumulate, from_document, InputEncryption, MetricNode, SharePolicy, XorEngine, XorShare,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::Value;

fn shared_list(engine: &XorEngine, len: usize) -> MetricNode<XorShare> {
    let doc = Value::Array((0..len).map(|_| Value::from(rand::random::<i64>())).collect());
    let mut tree: MetricNode<XorShare> = from_document(&doc).unwrap();
    tree.promote_all(InputEncryption::Xor, SharePolicy::Private, engine)
        .unwrap();
    tree
}

/// Runs `f` on both parties, the partner on its own thread.
fn run_pair(f: impl Fn(&XorEngine) + Send + Clone + 'static) {
    let (publisher, partner) = XorEngine::pair(rand::random());
    let g = f.clone();
    let handle = thread::spawn(move || g(&partner));
    f(&publisher);
    handle.join().unwrap();
}

fn bench_secure(c: &mut Criterion) {
    let mut group = c.benchmark_group("XOR Shared Leaves");
    group.sample_size(10);

    for len in [1, 16, 64] {
        group.bench_with_input(BenchmarkId::new("Accumulate", len), &len, |b, &len| {
            b.iter(|| {
                run_pair(move |engine| {
                    let mut dst = shared_list(engine, len);
                    accumulate(&mut dst, shared_list(engine, len)).unwrap();
                })
            })
        });
    }

    group.bench_function("Compare Then Mux", |b| {
        b.iter(|| {
            run_pair(|engine| {
                let tree = shared_list(engine, 2);
                let mut best = tree.get_at_index(0).unwrap().clone();
                let other = tree.get_at_index(1).unwrap();
                let condition = other.is_greater_or_equal(&best).unwrap();
                best.mux(&condition, other).unwrap();
            })
        })
    });

    group.finish();
}

criterion_group!(benches, bench_secure);
criterion_main!(benches);
