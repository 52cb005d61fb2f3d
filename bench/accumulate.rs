use aggtree::{accumulate, from_document, new_like, MetricNode, PlaintextMetrics};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

pub fn generate_random_document(width: usize) -> Value {
    let campaigns = (0..width)
        .map(|i| {
            (
                format!("campaign{i}"),
                json!({
                    "sales": rand::random::<u32>(),
                    "conversions": (0..8).map(|_| rand::random::<u16>()).collect::<Vec<_>>(),
                }),
            )
        })
        .collect::<serde_json::Map<_, _>>();
    Value::Object(campaigns)
}

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Plaintext Accumulate");

    for width in [10, 100, 1000] {
        let src: PlaintextMetrics = from_document(&generate_random_document(width)).unwrap();
        let dst = new_like(&src);

        group.bench_with_input(BenchmarkId::new("Dict of Campaigns", width), &width, |b, _| {
            b.iter(|| {
                let mut dst = dst.clone();
                accumulate(&mut dst, black_box(src.clone())).unwrap();
                dst
            })
        });
    }

    // Deep trees stress the traversal queue
    let mut deep = PlaintextMetrics::new_value(1);
    for _ in 0..1000 {
        deep = MetricNode::List(vec![deep]);
    }
    group.bench_function("Deep List", |b| {
        b.iter(|| {
            let mut dst = new_like(&deep);
            accumulate(&mut dst, black_box(deep.clone())).unwrap();
            dst
        })
    });

    group.finish();
}

fn bench_from_document(c: &mut Criterion) {
    let doc = generate_random_document(1000);
    c.bench_function("Load Document", |b| {
        b.iter(|| from_document::<aggtree::Unshared>(black_box(&doc)).unwrap())
    });
}

criterion_group!(benches, bench_accumulate, bench_from_document);
criterion_main!(benches);
