use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use memotable::{BoxError, Cache, Ident};

fn doubling_cache() -> Cache<u64> {
    Cache::new(|key: Ident| -> Result<u64, BoxError> { Ok(key.into_raw() as u64 * 2) })
}

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit_1k_keys", |b| {
        let mut cache = doubling_cache();
        let keys: Vec<Ident> = (1..=1000usize).map(|i| Ident::from_raw(i << 4)).collect();

        // Warm every key so the loop below only measures hits
        for &key in &keys {
            cache.get(key).unwrap();
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(*cache.get(keys[counter % 1000]).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1000));

    group.bench_function("compute_1k_with_growth", |b| {
        let keys: Vec<Ident> = (1..=1000usize).map(|i| Ident::from_raw(i << 4)).collect();

        b.iter_batched(
            doubling_cache,
            |mut cache| {
                for &key in &keys {
                    black_box(*cache.get(key).unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_remove_cycle", |b| {
        let mut cache = doubling_cache();
        let key = Ident::from_raw(0x4000);

        let mut counter = 0u64;
        b.iter(|| {
            if counter % 2 == 0 {
                cache.set(key, counter).unwrap();
            } else {
                black_box(cache.remove(key).ok());
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_get, bench_fill, bench_churn);
criterion_main!(benches);
